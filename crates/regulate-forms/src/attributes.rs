//! HTML attributes carried by a field

use crate::resolver::value_to_string;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Ordered HTML attribute map.
///
/// Always holds `name` and `value`. Merging overwrites matching keys and
/// appends the rest, preserving first-insertion order.
///
/// # Examples
///
/// ```
/// use regulate_forms::HtmlAttributes;
/// use serde_json::json;
///
/// let mut attrs = HtmlAttributes::new("author~name", &json!("Ada"));
/// attrs.merge([("class", "wide"), ("value", "Grace")]);
///
/// assert_eq!(attrs.get("value"), Some("Grace"));
/// assert_eq!(attrs.get("class"), Some("wide"));
/// assert_eq!(attrs.to_html(), r#"name="author~name" value="Grace" class="wide""#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HtmlAttributes(IndexMap<String, String>);

impl HtmlAttributes {
	pub fn new(encoded_name: &str, value: &Value) -> Self {
		let mut map = IndexMap::new();
		map.insert("name".to_string(), encoded_name.to_string());
		map.insert("value".to_string(), value_to_string(value));
		Self(map)
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.insert(key.into(), value.into());
	}

	/// Merge attributes, overwriting keys that already exist
	pub fn merge<K, V, I>(&mut self, attributes: I)
	where
		K: Into<String>,
		V: Into<String>,
		I: IntoIterator<Item = (K, V)>,
	{
		for (key, value) in attributes {
			self.set(key, value);
		}
	}

	/// Remove an attribute. `name` and `value` are kept.
	pub fn remove(&mut self, key: &str) -> Option<String> {
		if matches!(key, "name" | "value") {
			return None;
		}
		self.0.shift_remove(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Render as `key="value"` pairs with escaped values
	pub fn to_html(&self) -> String {
		self.0
			.iter()
			.map(|(key, value)| format!(r#"{}="{}""#, key, regulate_core::html::escape(value)))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_new_always_has_name_and_value() {
		// Act
		let attrs = HtmlAttributes::new("price", &Value::Null);

		// Assert
		assert_eq!(attrs.get("name"), Some("price"));
		assert_eq!(attrs.get("value"), Some(""));
		assert_eq!(attrs.len(), 2);
	}

	#[rstest]
	fn test_merge_is_additive_for_new_keys() {
		// Arrange
		let mut attrs = HtmlAttributes::new("title", &json!("x"));

		// Act
		attrs.merge([("placeholder", "Title")]);
		attrs.merge([("class", "a")]);
		attrs.merge([("class", "b")]);

		// Assert
		let keys: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
		assert_eq!(keys, vec!["name", "value", "placeholder", "class"]);
		assert_eq!(attrs.get("class"), Some("b"));
	}

	#[rstest]
	fn test_name_and_value_cannot_be_removed() {
		// Arrange
		let mut attrs = HtmlAttributes::new("title", &json!("x"));
		attrs.set("disabled", "disabled");

		// Act
		let removed_name = attrs.remove("name");
		let removed_disabled = attrs.remove("disabled");

		// Assert
		assert_eq!(removed_name, None);
		assert_eq!(removed_disabled.as_deref(), Some("disabled"));
		assert_eq!(attrs.get("name"), Some("title"));
	}

	#[rstest]
	fn test_to_html_escapes_values() {
		// Arrange
		let attrs = HtmlAttributes::new("q", &json!(r#"<"x">"#));

		// Act & Assert
		assert_eq!(attrs.to_html(), r#"name="q" value="&lt;&quot;x&quot;&gt;""#);
	}
}
