//! Browse list support
//!
//! Columns render resolved values for read-only lists, filters translate
//! submitted values into query constraints and [`BrowsePlan`] ties both to a
//! [`ManageableModel`](crate::ManageableModel) together with paging.

pub mod column;
pub mod filter;
pub mod page;
pub mod query;

pub use column::{BrowseColumn, ColumnContext, ColumnKind, RenderTransform, render_row};
pub use filter::BrowseFilter;
pub use page::{BrowsePlan, BrowseRequest, MAX_PER_PAGE, Paginator};
pub use query::{ColumnRef, Constraint, Direction, FilterOperator, Query, QueryBuilder};
