//! The model collaborator
//!
//! Regulate assumes Eloquent-like semantics from the records it manages:
//! attributes are read and written by name, relations are reached through
//! named accessors, and a record knows whether it is being created.

use crate::error::Result;
use serde_json::Value;

/// A record managed by the admin panel.
///
/// Implementors own persistence; the field pipeline only reads attributes
/// while rendering and writes them back during submission-apply.
///
/// # Examples
///
/// ```
/// use regulate_core::{Model, Result};
/// use serde_json::{Value, json};
/// use std::collections::HashMap;
///
/// struct Post {
///     attributes: HashMap<String, Value>,
/// }
///
/// impl Model for Post {
///     fn model_name(&self) -> &str {
///         "Post"
///     }
///     fn get_attribute(&self, name: &str) -> Option<Value> {
///         self.attributes.get(name).cloned()
///     }
///     fn set_attribute(&mut self, name: &str, value: Value) {
///         self.attributes.insert(name.to_string(), value);
///     }
///     fn has_column(&self, name: &str) -> bool {
///         matches!(name, "id" | "title")
///     }
///     fn relation(&self, name: &str) -> Result<Option<&dyn Model>> {
///         Err(regulate_core::Error::UnknownRelation {
///             model: "Post".into(),
///             relation: name.into(),
///         })
///     }
///     fn relation_mut(&mut self, name: &str) -> Result<Option<&mut dyn Model>> {
///         Err(regulate_core::Error::UnknownRelation {
///             model: "Post".into(),
///             relation: name.into(),
///         })
///     }
///     fn is_being_created(&self) -> bool {
///         !self.attributes.contains_key("id")
///     }
///     fn save(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let mut post = Post { attributes: HashMap::new() };
/// post.set_attribute("title", json!("Hello"));
/// assert_eq!(post.get_attribute("title"), Some(json!("Hello")));
/// assert!(post.is_being_created());
/// assert_eq!(post.primary_key(), None);
/// ```
pub trait Model {
	/// Human-readable model name, used in error messages
	fn model_name(&self) -> &str;

	/// Read an attribute by name. `None` means the attribute is not set.
	fn get_attribute(&self, name: &str) -> Option<Value>;

	/// Write an attribute by name
	fn set_attribute(&mut self, name: &str, value: Value);

	/// Whether the underlying table has a column with this name
	fn has_column(&self, name: &str) -> bool;

	/// Follow a relation accessor.
	///
	/// Returns `Ok(None)` when the relation exists but no related record is
	/// attached, and [`Error::UnknownRelation`](crate::Error::UnknownRelation)
	/// when the model defines no such relation.
	fn relation(&self, name: &str) -> Result<Option<&dyn Model>>;

	/// Mutable counterpart of [`Model::relation`]
	fn relation_mut(&mut self, name: &str) -> Result<Option<&mut dyn Model>>;

	/// Whether this record is new (create page) rather than existing (edit page)
	fn is_being_created(&self) -> bool;

	/// Name of the primary key column
	fn primary_key_name(&self) -> &str {
		"id"
	}

	/// Current primary key value, if the record has one
	fn primary_key(&self) -> Option<Value> {
		self.get_attribute(self.primary_key_name())
			.filter(|value| !value.is_null())
	}

	/// The primary key the next inserted record will receive, when known.
	///
	/// Used by upload filename templates (`{id}`) on create pages.
	fn next_primary_key(&self) -> Option<i64> {
		None
	}

	/// Persist the record
	fn save(&mut self) -> Result<()>;
}
