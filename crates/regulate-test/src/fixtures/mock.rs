use mockall::mock;
use regulate_core::{Result, Storage};
use std::path::PathBuf;

// ============================================================================
// mockall-based Storage Mock
// ============================================================================

mock! {
	/// Mock implementation of the Storage trait using mockall
	///
	/// Use it where a test must prove a disk call happens exactly once, or
	/// never. For content checks prefer [`InMemoryStorage`](regulate_core::InMemoryStorage).
	///
	/// ```rust
	/// use mockall::predicate::eq;
	/// use regulate_core::Storage;
	/// use regulate_test::MockStorage;
	///
	/// let mut storage = MockStorage::new();
	/// storage
	///     .expect_delete()
	///     .with(eq("avatars/old.png"))
	///     .times(1)
	///     .returning(|_| Ok(()));
	///
	/// storage.delete("avatars/old.png").unwrap();
	/// ```
	pub Storage {}

	impl Storage for Storage {
		fn exists(&self, path: &str) -> bool;
		fn put(&self, path: &str, bytes: &[u8]) -> Result<()>;
		fn delete(&self, path: &str) -> Result<()>;
		fn url(&self, path: &str) -> String;
		fn path(&self, path: &str) -> PathBuf;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use mockall::predicate::eq;
	use rstest::rstest;

	#[rstest]
	fn test_mock_storage_put_with_verification() {
		// Arrange
		let mut storage = MockStorage::new();
		storage
			.expect_put()
			.with(eq("docs/a.pdf"), eq(&b"pdf"[..]))
			.times(1)
			.returning(|_, _| Ok(()));

		// Act
		let result = storage.put("docs/a.pdf", b"pdf");

		// Assert
		assert!(result.is_ok());
	}
}
