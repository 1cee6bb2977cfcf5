//! Query-builder boundary for browse filters and pagination

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators a browse filter can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
	Like,
	NotLike,
	Eq,
	Ne,
	Gt,
	Lt,
	Gte,
	Lte,
}

impl FilterOperator {
	/// Parse the operator as written in a filter configuration
	///
	/// # Examples
	///
	/// ```
	/// use regulate_admin::browse::FilterOperator;
	///
	/// assert_eq!(FilterOperator::parse("not like"), Some(FilterOperator::NotLike));
	/// assert_eq!(FilterOperator::parse(">="), Some(FilterOperator::Gte));
	/// assert_eq!(FilterOperator::parse("~"), None);
	/// ```
	pub fn parse(operator: &str) -> Option<Self> {
		match operator.trim().to_ascii_lowercase().as_str() {
			"like" => Some(Self::Like),
			"not like" => Some(Self::NotLike),
			"=" => Some(Self::Eq),
			"!=" | "<>" => Some(Self::Ne),
			">" => Some(Self::Gt),
			"<" => Some(Self::Lt),
			">=" => Some(Self::Gte),
			"<=" => Some(Self::Lte),
			_ => None,
		}
	}

	pub fn as_sql(self) -> &'static str {
		match self {
			Self::Like => "LIKE",
			Self::NotLike => "NOT LIKE",
			Self::Eq => "=",
			Self::Ne => "!=",
			Self::Gt => ">",
			Self::Lt => "<",
			Self::Gte => ">=",
			Self::Lte => "<=",
		}
	}

	/// Whether values are wrapped in `%` wildcards
	pub fn is_like(self) -> bool {
		matches!(self, Self::Like | Self::NotLike)
	}
}

impl fmt::Display for FilterOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_sql())
	}
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	#[default]
	Asc,
	Desc,
}

impl Direction {
	pub fn as_sql(self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}
}

/// A column reference, optionally through a join alias and into a JSON document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
	pub table: Option<String>,
	pub column: String,
	pub json_path: Vec<String>,
}

impl ColumnRef {
	pub fn new(column: impl Into<String>) -> Self {
		Self {
			table: None,
			column: column.into(),
			json_path: Vec::new(),
		}
	}

	pub fn on(mut self, table: impl Into<String>) -> Self {
		self.table = Some(table.into());
		self
	}

	pub fn json(mut self, path: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.json_path = path.into_iter().map(Into::into).collect();
		self
	}
}

fn quote(identifier: &str) -> String {
	format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn quote_literal(literal: &str) -> String {
	format!("'{}'", literal.replace('\'', "''"))
}

impl fmt::Display for ColumnRef {
	/// Renders PostgreSQL syntax: `"alias"."column"->'a'->>'b'`
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(table) = &self.table {
			write!(f, "{}.", quote(table))?;
		}
		write!(f, "{}", quote(&self.column))?;
		let last = self.json_path.len().saturating_sub(1);
		for (index, key) in self.json_path.iter().enumerate() {
			let arrow = if index == last { "->>" } else { "->" };
			write!(f, "{}{}", arrow, quote_literal(key))?;
		}
		Ok(())
	}
}

/// One `column <op> value` constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
	pub column: ColumnRef,
	pub operator: FilterOperator,
	pub value: String,
}

/// Chainable query-builder boundary
///
/// Browse filters and plans only ever talk to this trait, so any query
/// builder can sit behind them. Every method consumes and returns the
/// builder.
pub trait QueryBuilder: Sized {
	fn filter(self, constraint: Constraint) -> Self;

	/// Join `relation` under `alias`
	fn join(self, relation: &str, alias: &str) -> Self;

	fn order_by(self, column: ColumnRef, direction: Direction) -> Self;

	fn limit(self, limit: usize) -> Self;

	fn offset(self, offset: usize) -> Self;
}

/// Recording [`QueryBuilder`] that renders a parameterised SQL statement
///
/// # Examples
///
/// ```
/// use regulate_admin::browse::{ColumnRef, Constraint, Direction, FilterOperator, Query, QueryBuilder};
///
/// let query = Query::new("posts")
///     .filter(Constraint {
///         column: ColumnRef::new("title"),
///         operator: FilterOperator::Like,
///         value: "%rust%".to_string(),
///     })
///     .order_by(ColumnRef::new("id"), Direction::Desc)
///     .limit(20);
///
/// let (sql, params) = query.to_sql();
/// assert_eq!(sql, r#"SELECT "posts".* FROM "posts" WHERE "title" LIKE $1 ORDER BY "id" DESC LIMIT 20"#);
/// assert_eq!(params, vec!["%rust%"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
	table: String,
	joins: Vec<(String, String)>,
	constraints: Vec<Constraint>,
	order: Vec<(ColumnRef, Direction)>,
	limit: Option<usize>,
	offset: Option<usize>,
}

impl Query {
	pub fn new(table: impl Into<String>) -> Self {
		Self {
			table: table.into(),
			joins: Vec::new(),
			constraints: Vec::new(),
			order: Vec::new(),
			limit: None,
			offset: None,
		}
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	pub fn constraints(&self) -> &[Constraint] {
		&self.constraints
	}

	/// `(relation, alias)` pairs in join order
	pub fn joins(&self) -> &[(String, String)] {
		&self.joins
	}

	pub fn ordering(&self) -> &[(ColumnRef, Direction)] {
		&self.order
	}

	pub fn limit_value(&self) -> Option<usize> {
		self.limit
	}

	pub fn offset_value(&self) -> Option<usize> {
		self.offset
	}

	/// SQL text with `$n` placeholders and the bound values in order
	pub fn to_sql(&self) -> (String, Vec<String>) {
		let mut sql = format!("SELECT {}.* FROM {}", quote(&self.table), quote(&self.table));
		for (relation, alias) in &self.joins {
			sql.push_str(&format!(" LEFT JOIN {} AS {}", quote(relation), quote(alias)));
		}

		let mut params = Vec::with_capacity(self.constraints.len());
		if !self.constraints.is_empty() {
			let clauses: Vec<String> = self
				.constraints
				.iter()
				.map(|constraint| {
					params.push(constraint.value.clone());
					format!(
						"{} {} ${}",
						constraint.column,
						constraint.operator.as_sql(),
						params.len()
					)
				})
				.collect();
			sql.push_str(" WHERE ");
			sql.push_str(&clauses.join(" AND "));
		}

		if !self.order.is_empty() {
			let order: Vec<String> = self
				.order
				.iter()
				.map(|(column, direction)| format!("{} {}", column, direction.as_sql()))
				.collect();
			sql.push_str(" ORDER BY ");
			sql.push_str(&order.join(", "));
		}
		if let Some(limit) = self.limit {
			sql.push_str(&format!(" LIMIT {}", limit));
		}
		if let Some(offset) = self.offset {
			sql.push_str(&format!(" OFFSET {}", offset));
		}
		(sql, params)
	}
}

impl QueryBuilder for Query {
	fn filter(mut self, constraint: Constraint) -> Self {
		self.constraints.push(constraint);
		self
	}

	fn join(mut self, relation: &str, alias: &str) -> Self {
		let join = (relation.to_string(), alias.to_string());
		if !self.joins.contains(&join) {
			self.joins.push(join);
		}
		self
	}

	fn order_by(mut self, column: ColumnRef, direction: Direction) -> Self {
		self.order.push((column, direction));
		self
	}

	fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}

	fn offset(mut self, offset: usize) -> Self {
		self.offset = Some(offset);
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(ColumnRef::new("name"), r#""name""#)]
	#[case(ColumnRef::new("name").on("author"), r#""author"."name""#)]
	#[case(ColumnRef::new("meta").json(["seo", "title"]), r#""meta"->'seo'->>'title'"#)]
	#[case(ColumnRef::new("we\"ird"), r#""we""ird""#)]
	fn test_column_ref_rendering(#[case] column: ColumnRef, #[case] expected: &str) {
		assert_eq!(column.to_string(), expected);
	}

	#[rstest]
	fn test_joins_are_deduplicated() {
		// Arrange
		let query = Query::new("posts")
			.join("author", "author")
			.join("author", "author");

		// Act
		let (sql, params) = query.to_sql();

		// Assert
		assert_eq!(sql, r#"SELECT "posts".* FROM "posts" LEFT JOIN "author" AS "author""#);
		assert!(params.is_empty());
	}

	#[rstest]
	fn test_constraints_are_anded_with_numbered_params() {
		// Arrange
		let query = Query::new("posts")
			.filter(Constraint {
				column: ColumnRef::new("views"),
				operator: FilterOperator::Gte,
				value: "10".to_string(),
			})
			.filter(Constraint {
				column: ColumnRef::new("title"),
				operator: FilterOperator::NotLike,
				value: "%draft%".to_string(),
			})
			.offset(40);

		// Act
		let (sql, params) = query.to_sql();

		// Assert
		assert_eq!(
			sql,
			r#"SELECT "posts".* FROM "posts" WHERE "views" >= $1 AND "title" NOT LIKE $2 OFFSET 40"#
		);
		assert_eq!(params, vec!["10", "%draft%"]);
	}
}
