//! File storage boundary
//!
//! Uploads are written through a disk abstraction with five operations.
//! File I/O is committed independently of the model save: a failure
//! between storing a file and persisting the record leaves the file behind.

pub mod local;
pub mod memory;

pub use local::LocalStorage;
pub use memory::InMemoryStorage;

use crate::error::Result;
use std::path::PathBuf;

/// Disk abstraction used by file and image fields
pub trait Storage: Send + Sync {
	/// Whether a file exists at `path`
	fn exists(&self, path: &str) -> bool;

	/// Write `bytes` to `path`, creating parent directories as needed
	fn put(&self, path: &str, bytes: &[u8]) -> Result<()>;

	/// Delete the file at `path`. Deleting a missing file is not an error.
	fn delete(&self, path: &str) -> Result<()>;

	/// Public URL for `path`
	fn url(&self, path: &str) -> String;

	/// Absolute location of `path` on the backing store
	fn path(&self, path: &str) -> PathBuf;
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
	let base = base.trim_end_matches('/');
	let path = path.trim_start_matches('/');
	format!("{}/{}", base, path)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/uploads/", "/avatars/a.png", "/uploads/avatars/a.png")]
	#[case("/uploads", "avatars/a.png", "/uploads/avatars/a.png")]
	#[case("https://cdn.example.com/", "a.png", "https://cdn.example.com/a.png")]
	fn test_join_url(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
		// Act
		let url = join_url(base, path);

		// Assert
		assert_eq!(url, expected);
	}
}
