//! Key/value editor over a JSON object

use crate::context::{ApplyContext, BuildContext, RenderContext};
use crate::error::{FieldError, FieldResult};
use crate::field::{Applied, FieldCore, ManageableField, base_template_data};
use crate::input::SubmittedInput;
use crate::resolver::{data_get, data_set, decode_document, encode_document, value_to_string};
use indexmap::IndexMap;
use regulate_core::Result;
use serde_json::{Map, Value, json};

/// Key/value editor storing a flat JSON object as minified text
/// (or as an object when bound to a JSON path)
///
/// Submissions may be an object, an array of `{key, value}` rows (the
/// widget's native shape) or JSON text of either.
#[derive(Debug)]
pub struct JsonUi {
	core: FieldCore,
	default_values: IndexMap<String, Value>,
}

impl JsonUi {
	pub fn new(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
			default_values: IndexMap::new(),
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Fill `path` (dot-separated) with `value` when the document lacks it
	pub fn default_value(mut self, path: &str, value: impl Into<Value>) -> Self {
		self.default_values.insert(path.to_string(), value.into());
		self
	}

	/// The stored object with defaults merged in
	pub fn document(&self) -> Map<String, Value> {
		let mut document = decode_document(self.core.value().clone());
		if !document.is_object() {
			document = Value::Object(Map::new());
		}
		for (path, value) in &self.default_values {
			let pointer: Vec<&str> = path.split('.').collect();
			if data_get(&document, &pointer).is_none() {
				data_set(&mut document, &pointer, value.clone());
			}
		}
		match document {
			Value::Object(map) => map,
			_ => Map::new(),
		}
	}

	fn invalid(&self, detail: impl std::fmt::Display) -> FieldError {
		FieldError::InvalidJson {
			field: self.core.encoded_name().to_string(),
			message: format!(
				"The {} field must be a set of key/value pairs ({}).",
				self.message_label(),
				detail
			),
		}
	}

	fn collect_pairs(&self, raw: &Value) -> FieldResult<Map<String, Value>> {
		match raw {
			Value::Object(map) => Ok(map.clone()),
			Value::Array(rows) => {
				let mut map = Map::new();
				for row in rows {
					let key = row
						.get("key")
						.map(value_to_string)
						.ok_or_else(|| self.invalid("row without a key"))?;
					let key = key.trim();
					if key.is_empty() {
						continue;
					}
					let value = row.get("value").cloned().unwrap_or(Value::Null);
					map.insert(key.to_string(), value);
				}
				Ok(map)
			}
			Value::String(text) => {
				let decoded: Value = serde_json::from_str(text).map_err(|e| self.invalid(e))?;
				match decoded {
					Value::Object(_) | Value::Array(_) => self.collect_pairs(&decoded),
					_ => Err(self.invalid("expected an object")),
				}
			}
			other => Err(self.invalid(format!("unexpected value {}", other))),
		}
	}
}

impl ManageableField for JsonUi {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"json_ui"
	}

	fn display_value(&self) -> Value {
		Value::Object(self.document())
	}

	fn apply_submitted_value(
		&mut self,
		_input: &SubmittedInput,
		raw: Option<&Value>,
		_cx: &ApplyContext<'_>,
	) -> FieldResult<Applied> {
		let map = match raw {
			None | Some(Value::Null) => Map::new(),
			Some(Value::String(text)) if text.trim().is_empty() => Map::new(),
			Some(raw) => self.collect_pairs(raw)?,
		};
		Ok(Applied::Set(encode_document(self.core.path(), Value::Object(map))))
	}

	fn template_data(&self, cx: &RenderContext<'_>) -> Value {
		let mut data = base_template_data(self, cx);
		let document = match &data["value"] {
			Value::Object(map) => map.clone(),
			_ => self.document(),
		};
		data["pairs"] = document
			.iter()
			.map(|(key, value)| json!({"key": key, "value": value_to_string(value)}))
			.collect();
		data
	}
}
