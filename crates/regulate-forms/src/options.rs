//! Field options shared by every field type

use indexmap::IndexMap;
use serde_json::Value;

/// Where a field's label comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelSource {
	/// Use this text verbatim
	Explicit(String),
	/// Derive from the last segment of the field name
	#[default]
	Derived,
	/// Render without a label
	Suppressed,
}

/// Options controlling how a field is labelled, wrapped and valued
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
	pub label: LabelSource,
	/// Extra CSS class for the field's container
	pub container_class: Option<String>,
	/// Help text rendered below the widget
	pub notes: Option<String>,
	/// Open a field group before this field
	pub begin_group: bool,
	/// Close the field group after this field
	pub end_group: bool,
	/// Do not prefill the widget from previously submitted input
	pub ignore_old: bool,
	/// Explicit value overriding the one resolved from the model
	pub value: Option<Value>,
	/// Type-specific options exposed to templates
	pub extra: IndexMap<String, Value>,
}

impl FieldOptions {
	pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.extra.insert(key.into(), value.into());
	}

	pub fn extra(&self, key: &str) -> Option<&Value> {
		self.extra.get(key)
	}
}
