//! Filesystem-backed storage

use super::{Storage, join_url};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Storage rooted at a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalStorage {
	root: PathBuf,
	base_url: String,
}

impl LocalStorage {
	/// Create a storage rooted at `root`, serving files under `base_url`
	///
	/// # Examples
	///
	/// ```
	/// use regulate_core::{LocalStorage, Storage};
	///
	/// let storage = LocalStorage::new("/var/www/public", "/");
	/// assert_eq!(storage.url("uploads/a.png"), "/uploads/a.png");
	/// ```
	pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
		Self {
			root: root.into(),
			base_url: base_url.into(),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Join `path` onto the root, refusing anything that escapes it
	fn resolve(&self, path: &str) -> Result<PathBuf> {
		let relative = Path::new(path.trim_start_matches('/'));
		for component in relative.components() {
			match component {
				Component::Normal(_) | Component::CurDir => {}
				_ => {
					tracing::warn!(path, "path traversal attempt blocked in LocalStorage");
					return Err(Error::configuration(format!(
						"Path '{}' escapes the storage root",
						path
					)));
				}
			}
		}
		Ok(self.root.join(relative))
	}
}

impl Storage for LocalStorage {
	fn exists(&self, path: &str) -> bool {
		self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
	}

	fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
		let target = self.resolve(path)?;
		if let Some(parent) = target.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::write(&target, bytes)?;
		tracing::debug!(path, size = bytes.len(), "stored file");
		Ok(())
	}

	fn delete(&self, path: &str) -> Result<()> {
		let target = self.resolve(path)?;
		if target.is_file() {
			fs::remove_file(&target)?;
			tracing::debug!(path, "deleted file");
		}
		Ok(())
	}

	fn url(&self, path: &str) -> String {
		join_url(&self.base_url, path)
	}

	fn path(&self, path: &str) -> PathBuf {
		self.root.join(path.trim_start_matches('/'))
	}
}
