//! Registry of manageable models keyed by URL alias

use crate::error::{AdminError, AdminResult};
use crate::manageable::ManageableModel;
use indexmap::IndexMap;
use std::sync::Arc;

/// Manageable models in registration order
#[derive(Default, Clone)]
pub struct Registry {
	models: IndexMap<String, Arc<dyn ManageableModel>>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a model under its URL alias, replacing any previous one
	pub fn register<M: ManageableModel + 'static>(&mut self, model: M) {
		let alias = model.url_alias().to_string();
		if self.models.insert(alias.clone(), Arc::new(model)).is_some() {
			tracing::warn!(alias = %alias, "replaced registered model");
		} else {
			tracing::debug!(alias = %alias, "registered model");
		}
	}

	pub fn get(&self, alias: &str) -> AdminResult<Arc<dyn ManageableModel>> {
		self.models
			.get(alias)
			.cloned()
			.ok_or_else(|| AdminError::ModelNotRegistered(alias.to_string()))
	}

	pub fn is_registered(&self, alias: &str) -> bool {
		self.models.contains_key(alias)
	}

	/// URL aliases in registration order
	pub fn aliases(&self) -> impl Iterator<Item = &str> {
		self.models.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.models.len()
	}

	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("models", &self.models.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use regulate_core::Result;
	use regulate_forms::{BuildContext, ManageableField};
	use rstest::rstest;

	struct Named(&'static str);

	impl ManageableModel for Named {
		fn url_alias(&self) -> &str {
			self.0
		}

		fn display_name(&self) -> &str {
			self.0
		}

		fn fields(&self, _cx: &BuildContext<'_>) -> Result<Vec<Box<dyn ManageableField>>> {
			Ok(Vec::new())
		}
	}

	#[rstest]
	fn test_lookup_by_alias() {
		// Arrange
		let mut registry = Registry::new();
		registry.register(Named("posts"));
		registry.register(Named("users"));

		// Act
		let posts = registry.get("posts").unwrap();

		// Assert
		assert_eq!(posts.display_name(), "posts");
		assert_eq!(registry.aliases().collect::<Vec<_>>(), vec!["posts", "users"]);
	}

	#[rstest]
	fn test_unknown_alias_is_not_registered() {
		// Arrange
		let registry = Registry::new();

		// Act
		let error = registry.get("ghosts").err().unwrap();

		// Assert
		assert!(matches!(error, AdminError::ModelNotRegistered(alias) if alias == "ghosts"));
		assert!(registry.is_empty());
	}

	#[rstest]
	fn test_reregistering_replaces() {
		// Arrange
		let mut registry = Registry::new();

		// Act
		registry.register(Named("posts"));
		registry.register(Named("posts"));

		// Assert
		assert_eq!(registry.len(), 1);
	}
}
