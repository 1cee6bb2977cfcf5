//! Manageable model configuration
//!
//! A [`ManageableModel`] describes how one model is edited and browsed: its
//! field set, its browse columns and filters, and where it lives in the
//! admin URL space.

use crate::browse::{BrowseColumn, BrowseFilter};
use regulate_core::{AdminSettings, Result};
use regulate_forms::{BuildContext, ManageableField};

/// Admin configuration for one model
///
/// # Examples
///
/// ```
/// use regulate_admin::ManageableModel;
/// use regulate_admin::browse::{BrowseColumn, BrowseFilter, FilterOperator};
/// use regulate_core::{AdminSettings, Result};
/// use regulate_forms::{BuildContext, Configure, ManageableField, Text};
///
/// struct Posts;
///
/// impl ManageableModel for Posts {
///     fn url_alias(&self) -> &str {
///         "posts"
///     }
///
///     fn display_name(&self) -> &str {
///         "Posts"
///     }
///
///     fn fields(&self, cx: &BuildContext<'_>) -> Result<Vec<Box<dyn ManageableField>>> {
///         Ok(vec![Text::new(cx, "title")?.required().boxed()])
///     }
///
///     fn browse_filters(&self) -> Result<Vec<BrowseFilter>> {
///         Ok(vec![BrowseFilter::new("title", FilterOperator::Like)?])
///     }
/// }
///
/// let posts = Posts;
/// assert_eq!(posts.table_name(), "posts");
/// assert_eq!(posts.browse_url(), "/posts/browse");
/// assert_eq!(posts.per_page(&AdminSettings::default()), 20);
/// ```
pub trait ManageableModel: Send + Sync {
	/// URL segment identifying the model, also the registry key
	fn url_alias(&self) -> &str;

	/// Human readable name shown in headings
	fn display_name(&self) -> &str;

	/// Database table browsed for this model
	///
	/// Defaults to the URL alias.
	fn table_name(&self) -> &str {
		self.url_alias()
	}

	/// The ordered editable field set for one record
	fn fields(&self, cx: &BuildContext<'_>) -> Result<Vec<Box<dyn ManageableField>>>;

	/// Columns shown on the browse page
	fn browse_columns(&self) -> Result<Vec<BrowseColumn>> {
		Ok(vec![BrowseColumn::new("id")?.sortable()])
	}

	/// Filters offered on the browse page
	fn browse_filters(&self) -> Result<Vec<BrowseFilter>> {
		Ok(Vec::new())
	}

	/// Records per browse page (falls back to the settings default)
	fn per_page(&self, settings: &AdminSettings) -> usize {
		settings.browse.per_page
	}

	/// Where a successful upsert redirects to
	fn browse_url(&self) -> String {
		format!("/{}/browse", self.url_alias())
	}
}
