//! Fixtures and test doubles
//!
//! The rstest fixtures below are meant to be pulled into test functions by
//! name:
//!
//! ```
//! use regulate_core::AdminSettings;
//! use regulate_test::fixtures::settings;
//! use rstest::rstest;
//!
//! #[rstest]
//! fn uses_defaults(settings: AdminSettings) {
//!     assert_eq!(settings.browse.per_page, 20);
//! }
//! ```

mod hasher;
mod mock;
mod record;
mod recording_renderer;

pub use hasher::PlainHasher;
pub use mock::MockStorage;
pub use record::TestRecord;
pub use recording_renderer::RecordingRenderer;

use regulate_core::{AdminSettings, InMemoryStorage, LocalStorage};
use rstest::fixture;
use tempfile::TempDir;

/// Default admin settings
#[fixture]
pub fn settings() -> AdminSettings {
	AdminSettings::default()
}

/// An empty in-memory storage serving URLs under `/storage`
#[fixture]
pub fn memory_storage() -> InMemoryStorage {
	InMemoryStorage::new("/storage")
}

/// A local storage rooted in a fresh temporary directory
///
/// Keep the returned [`TempDir`] alive for as long as the storage is used.
#[fixture]
pub fn temp_storage() -> (TempDir, LocalStorage) {
	let dir = tempfile::tempdir().expect("Failed to create temporary directory");
	let storage = LocalStorage::new(dir.path(), "/storage");
	(dir, storage)
}

/// A renderer that returns an empty string for every template
#[fixture]
pub fn renderer() -> RecordingRenderer {
	RecordingRenderer::new("")
}

#[cfg(test)]
mod tests {
	use super::*;
	use regulate_core::ViewRenderer;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_renderer_fixture_records_templates(renderer: RecordingRenderer) {
		// Act
		let html = renderer
			.render("fields/text.html", &json!({"name": "title"}))
			.unwrap();

		// Assert
		assert_eq!(html, "");
		assert_eq!(renderer.templates(), vec!["fields/text.html"]);
	}
}
