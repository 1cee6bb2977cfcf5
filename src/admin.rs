//! Browse and upsert layer
//!
//! This module provides access to browse planning and upsert orchestration
//! through the `regulate::admin` namespace.
//!
//! ```
//! use regulate::admin::browse::{BrowseFilter, FilterOperator, Query};
//!
//! let filter = BrowseFilter::new("author.name", FilterOperator::Eq).unwrap();
//! let (sql, _) = filter.apply(Query::new("posts"), "Ada").to_sql();
//! assert!(sql.contains(r#"LEFT JOIN "author" AS "author""#));
//! ```

pub use regulate_admin::*;
