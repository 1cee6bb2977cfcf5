//! Browse requests, plans and pagination

use super::column::{BrowseColumn, ColumnContext, render_row};
use super::filter::BrowseFilter;
use super::query::{ColumnRef, Direction, Query, QueryBuilder};
use crate::error::{AdminError, AdminResult};
use crate::manageable::ManageableModel;
use indexmap::IndexMap;
use regulate_core::{AdminSettings, Model, Result};
use regulate_forms::FieldPath;
use serde::{Deserialize, Serialize};

/// Largest page size a request may ask for
pub const MAX_PER_PAGE: usize = 500;

/// Browse query parameters
///
/// Every key that is not a paging or ordering parameter is a filter value
/// keyed by filter name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseRequest {
	/// Page number (1-indexed)
	pub page: Option<usize>,
	pub per_page: Option<usize>,
	/// Name of a sortable browse column
	pub order_by: Option<String>,
	pub direction: Direction,
	#[serde(flatten)]
	pub filters: IndexMap<String, String>,
}

impl BrowseRequest {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn page(mut self, page: usize) -> Self {
		self.page = Some(page);
		self
	}

	pub fn per_page(mut self, per_page: usize) -> Self {
		self.per_page = Some(per_page);
		self
	}

	pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
		self.order_by = Some(column.into());
		self.direction = direction;
		self
	}

	pub fn filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.filters.insert(name.into(), value.into());
		self
	}
}

/// Position of one page within a result set
///
/// # Examples
///
/// ```
/// use regulate_admin::browse::Paginator;
///
/// let page = Paginator::new(3, 10, 45);
/// assert_eq!(page.num_pages, 5);
/// assert_eq!(page.offset(), 20);
/// assert_eq!((page.start_index(), page.end_index()), (21, 30));
/// assert!(page.has_next() && page.has_previous());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
	/// Current page number (1-indexed)
	pub number: usize,
	pub per_page: usize,
	pub total: usize,
	pub num_pages: usize,
}

impl Paginator {
	/// Out-of-range page numbers are clamped; an empty result still has one page.
	pub fn new(number: usize, per_page: usize, total: usize) -> Self {
		let per_page = per_page.max(1);
		let num_pages = total.div_ceil(per_page).max(1);
		Self {
			number: number.clamp(1, num_pages),
			per_page,
			total,
			num_pages,
		}
	}

	pub fn offset(&self) -> usize {
		(self.number - 1) * self.per_page
	}

	pub fn has_next(&self) -> bool {
		self.number < self.num_pages
	}

	pub fn has_previous(&self) -> bool {
		self.number > 1
	}

	/// 1-based index of the first record on this page, 0 when empty
	pub fn start_index(&self) -> usize {
		if self.total == 0 { 0 } else { self.offset() + 1 }
	}

	/// 1-based index of the last record on this page, 0 when empty
	pub fn end_index(&self) -> usize {
		(self.number * self.per_page).min(self.total)
	}

	pub fn page_range(&self) -> std::ops::RangeInclusive<usize> {
		1..=self.num_pages
	}
}

/// A browse request resolved against a manageable model
#[derive(Debug, Clone)]
pub struct BrowsePlan {
	query: Query,
	columns: Vec<BrowseColumn>,
	filters: Vec<BrowseFilter>,
	active_filters: IndexMap<String, String>,
	page: usize,
	per_page: usize,
}

impl BrowsePlan {
	/// Check the model's filters, apply submitted filter values and ordering.
	///
	/// `prototype` is any instance of the model; it is only asked which
	/// columns exist. Unknown filter names and unsortable order columns are
	/// ignored with a warning.
	pub fn build(
		admin: &dyn ManageableModel,
		prototype: &dyn Model,
		request: &BrowseRequest,
		settings: &AdminSettings,
	) -> AdminResult<Self> {
		let columns = admin.browse_columns()?;
		let filters = admin.browse_filters()?;
		for filter in &filters {
			filter.check(prototype)?;
		}

		let per_page = request.per_page.unwrap_or_else(|| admin.per_page(settings));
		if per_page == 0 || per_page > MAX_PER_PAGE {
			return Err(AdminError::InvalidRequest(format!(
				"per_page must be between 1 and {}, got {}",
				MAX_PER_PAGE, per_page
			)));
		}

		let mut query = Query::new(admin.table_name());
		let mut active_filters = IndexMap::new();
		for (name, raw) in &request.filters {
			if raw.trim().is_empty() {
				continue;
			}
			match filters.iter().find(|filter| filter.name() == name.as_str()) {
				Some(filter) => {
					query = filter.apply(query, raw);
					active_filters.insert(name.clone(), raw.clone());
				}
				None => tracing::warn!(
					model = %admin.url_alias(),
					filter = %name,
					"ignoring unknown browse filter"
				),
			}
		}

		query = match &request.order_by {
			Some(name) => match columns.iter().find(|column| column.name() == name.as_str() && column.is_sortable()) {
				Some(column) => order_by_column(query, column.path(), request.direction),
				None => {
					tracing::warn!(
						model = %admin.url_alias(),
						column = %name,
						"ignoring order on unsortable column"
					);
					default_order(query, prototype)
				}
			},
			None => default_order(query, prototype),
		};

		tracing::debug!(
			model = %admin.url_alias(),
			filters = active_filters.len(),
			per_page,
			"planned browse query"
		);
		Ok(Self {
			query,
			columns,
			filters,
			active_filters,
			page: request.page.unwrap_or(1),
			per_page,
		})
	}

	/// The filtered and ordered query, without paging
	pub fn query(&self) -> &Query {
		&self.query
	}

	pub fn columns(&self) -> &[BrowseColumn] {
		&self.columns
	}

	pub fn filters(&self) -> &[BrowseFilter] {
		&self.filters
	}

	/// Filter values that were applied, keyed by filter name
	pub fn active_filters(&self) -> &IndexMap<String, String> {
		&self.active_filters
	}

	pub fn per_page(&self) -> usize {
		self.per_page
	}

	/// Column headers in display order
	pub fn headers(&self) -> Vec<String> {
		self.columns.iter().map(BrowseColumn::label).collect()
	}

	/// Page the query once the total record count is known
	pub fn paginate(&self, total: usize) -> (Query, Paginator) {
		let paginator = Paginator::new(self.page, self.per_page, total);
		let query = self
			.query
			.clone()
			.limit(paginator.per_page)
			.offset(paginator.offset());
		(query, paginator)
	}

	/// Render fetched records through the plan's columns
	pub fn rows(&self, records: &[&dyn Model], cx: ColumnContext<'_>) -> Result<Vec<Vec<String>>> {
		records
			.iter()
			.map(|record| render_row(&self.columns, *record, cx))
			.collect()
	}
}

fn order_by_column(query: Query, path: &FieldPath, direction: Direction) -> Query {
	let (query, base) = match path.relation() {
		Some(relation) => (
			query.join(relation, relation),
			ColumnRef::new(path.column()).on(relation),
		),
		None => (query, ColumnRef::new(path.column())),
	};
	let column = match path {
		FieldPath::Json { pointer, .. } => base.json(pointer.iter().cloned()),
		_ => base,
	};
	query.order_by(column, direction)
}

fn default_order(query: Query, prototype: &dyn Model) -> Query {
	query.order_by(ColumnRef::new(prototype.primary_key_name()), Direction::Desc)
}
