//! Page types and per-field page visibility

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The kind of page a field is rendered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
	Create,
	Edit,
	Browse,
	General,
}

impl PageType {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Create => "create",
			Self::Edit => "edit",
			Self::Browse => "browse",
			Self::General => "general",
		}
	}
}

impl fmt::Display for PageType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The set of pages a field is shown on. Defaults to create and edit.
///
/// # Examples
///
/// ```
/// use regulate_forms::{PageSet, PageType};
///
/// let mut pages = PageSet::default();
/// pages.show_only_on(&[PageType::Edit]);
/// pages.show_on(&[PageType::Create]);
/// assert!(pages.contains(PageType::Create) && pages.contains(PageType::Edit));
///
/// pages.hide_from(&[PageType::Edit]);
/// assert_eq!(pages.iter().collect::<Vec<_>>(), vec![PageType::Create]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSet(BTreeSet<PageType>);

impl Default for PageSet {
	fn default() -> Self {
		Self([PageType::Create, PageType::Edit].into_iter().collect())
	}
}

impl PageSet {
	/// Set difference
	pub fn hide_from(&mut self, pages: &[PageType]) {
		for page in pages {
			self.0.remove(page);
		}
	}

	/// Set union
	pub fn show_on(&mut self, pages: &[PageType]) {
		self.0.extend(pages.iter().copied());
	}

	/// Set replacement
	pub fn show_only_on(&mut self, pages: &[PageType]) {
		self.0 = pages.iter().copied().collect();
	}

	pub fn contains(&self, page: PageType) -> bool {
		self.0.contains(&page)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = PageType> + '_ {
		self.0.iter().copied()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_default_is_create_and_edit() {
		// Act
		let pages = PageSet::default();

		// Assert
		assert!(pages.contains(PageType::Create));
		assert!(pages.contains(PageType::Edit));
		assert!(!pages.contains(PageType::Browse));
		assert!(!pages.contains(PageType::General));
	}

	#[rstest]
	fn test_show_only_then_show_then_hide() {
		// Arrange
		let mut pages = PageSet::default();

		// Act
		pages.show_only_on(&[PageType::Edit]);
		pages.show_on(&[PageType::Create]);
		let after_union: Vec<_> = pages.iter().collect();
		pages.hide_from(&[PageType::Edit]);

		// Assert
		assert_eq!(after_union, vec![PageType::Create, PageType::Edit]);
		assert_eq!(pages.iter().collect::<Vec<_>>(), vec![PageType::Create]);
	}

	#[rstest]
	fn test_hide_from_absent_page_is_noop() {
		// Arrange
		let mut pages = PageSet::default();

		// Act
		pages.hide_from(&[PageType::Browse]);

		// Assert
		assert_eq!(pages, PageSet::default());
	}

	#[rstest]
	#[case(PageType::Create, "create")]
	#[case(PageType::General, "general")]
	fn test_page_type_display(#[case] page: PageType, #[case] expected: &str) {
		assert_eq!(page.to_string(), expected);
	}
}
