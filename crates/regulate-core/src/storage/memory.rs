//! In-memory storage

use super::{Storage, join_url};
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

/// Storage keeping files in a map, for previews and tests
#[derive(Debug, Default)]
pub struct InMemoryStorage {
	base_url: String,
	files: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			files: RwLock::new(HashMap::new()),
		}
	}

	/// Contents of the file at `path`, if stored
	pub fn read(&self, path: &str) -> Option<Vec<u8>> {
		self.files.read().get(normalize(path)).cloned()
	}

	/// Sorted list of stored paths
	pub fn paths(&self) -> Vec<String> {
		let mut paths: Vec<String> = self.files.read().keys().cloned().collect();
		paths.sort();
		paths
	}
}

fn normalize(path: &str) -> &str {
	path.trim_start_matches('/')
}

impl Storage for InMemoryStorage {
	fn exists(&self, path: &str) -> bool {
		self.files.read().contains_key(normalize(path))
	}

	fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
		self.files
			.write()
			.insert(normalize(path).to_string(), bytes.to_vec());
		Ok(())
	}

	fn delete(&self, path: &str) -> Result<()> {
		self.files.write().remove(normalize(path));
		Ok(())
	}

	fn url(&self, path: &str) -> String {
		join_url(&self.base_url, path)
	}

	fn path(&self, path: &str) -> PathBuf {
		PathBuf::from(normalize(path))
	}
}
