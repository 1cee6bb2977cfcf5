//! Browse filters: submitted filter values translated into query constraints

use super::query::{ColumnRef, Constraint, FilterOperator, QueryBuilder};
use regulate_core::{Error, Model, Result};
use regulate_forms::FieldPath;
use regulate_forms::path::label_from_name;

/// A filter on one column, relation column or JSON path of the browsed model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseFilter {
	name: String,
	path: FieldPath,
	operator: FilterOperator,
	alias: Option<String>,
	label: Option<String>,
}

impl BrowseFilter {
	/// # Examples
	///
	/// ```
	/// use regulate_admin::browse::{BrowseFilter, FilterOperator, Query, QueryBuilder};
	///
	/// let filter = BrowseFilter::new("title", FilterOperator::Like).unwrap();
	/// let query = filter.apply(Query::new("posts"), "rust, async");
	///
	/// let (sql, params) = query.to_sql();
	/// assert_eq!(sql, r#"SELECT "posts".* FROM "posts" WHERE "title" LIKE $1 AND "title" LIKE $2"#);
	/// assert_eq!(params, vec!["%rust%", "%async%"]);
	/// ```
	pub fn new(name: &str, operator: FilterOperator) -> Result<Self> {
		Ok(Self {
			name: name.to_string(),
			path: FieldPath::parse(name)?,
			operator,
			alias: None,
			label: None,
		})
	}

	/// Join alias for a relation filter
	pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
		self.alias = Some(alias.into());
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn operator(&self) -> FilterOperator {
		self.operator
	}

	pub fn label(&self) -> String {
		self.label
			.clone()
			.unwrap_or_else(|| label_from_name(&self.name))
	}

	/// Join alias used for relation filters: explicit, else the relation name
	pub fn alias(&self) -> Option<&str> {
		self.alias.as_deref().or(self.path.relation())
	}

	/// Check the filter against the browsed model.
	///
	/// A relation named like a column of the same model needs an explicit
	/// alias; otherwise the join alias would shadow the column.
	pub fn check(&self, model: &dyn Model) -> Result<()> {
		if let Some(relation) = self.path.relation()
			&& self.alias.is_none()
			&& model.has_column(relation)
		{
			return Err(Error::configuration(format!(
				"Filter '{}' joins relation '{}' which is also a column of '{}'; configure an alias with `with_alias`",
				self.name,
				relation,
				model.model_name()
			)));
		}
		Ok(())
	}

	/// Column expression the constraints compare against
	pub fn column(&self) -> ColumnRef {
		let base = |path: &FieldPath| match path.relation() {
			Some(_) => ColumnRef::new(path.column()).on(self.alias().unwrap_or_default()),
			None => ColumnRef::new(path.column()),
		};
		match &self.path {
			FieldPath::Json { base: inner, pointer } => base(inner).json(pointer.iter().cloned()),
			path => base(path),
		}
	}

	/// The submitted value split into the values constrained on.
	///
	/// Values are comma separated and trimmed. `like` operators drop empty
	/// segments; equality operators keep them so `""` can be matched.
	pub fn values(&self, raw: &str) -> Vec<String> {
		raw.split(',')
			.map(str::trim)
			.filter(|segment| !(self.operator.is_like() && segment.is_empty()))
			.map(|segment| {
				if self.operator.is_like() {
					format!("%{}%", segment)
				} else {
					segment.to_string()
				}
			})
			.collect()
	}

	/// Constrain `query` on every value in `raw`. All constraints are ANDed.
	pub fn apply<Q: QueryBuilder>(&self, query: Q, raw: &str) -> Q {
		let values = self.values(raw);
		if values.is_empty() {
			return query;
		}
		let mut query = query;
		if let (Some(relation), Some(alias)) = (self.path.relation(), self.alias()) {
			query = query.join(relation, alias);
		}
		let column = self.column();
		tracing::debug!(filter = %self.name, operator = %self.operator, count = values.len(), "applying browse filter");
		values.into_iter().fold(query, |query, value| {
			query.filter(Constraint {
				column: column.clone(),
				operator: self.operator,
				value,
			})
		})
	}
}
