//! Raw JSON editor

use crate::context::{ApplyContext, BuildContext};
use crate::error::{FieldError, FieldResult};
use crate::field::{Applied, FieldCore, ManageableField};
use crate::input::SubmittedInput;
use crate::resolver::{data_get, data_set, decode_document, encode_document};
use indexmap::IndexMap;
use regulate_core::{AdminSettings, Result};
use serde_json::{Map, Value};

const INDENT: &str = "  ";

/// JSON text editor
///
/// The widget shows the stored document pretty-printed, with configured
/// defaults filled in for absent keys. With `hide_containing_braces` the
/// outermost braces (or brackets) are hidden and restored on submit.
#[derive(Debug)]
pub struct Json {
	core: FieldCore,
	default_values: IndexMap<String, Value>,
	hide_containing_braces: bool,
}

impl Json {
	pub fn new(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
			default_values: IndexMap::new(),
			hide_containing_braces: false,
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Fill `path` (dot-separated) with `value` when the document lacks it
	pub fn default_value(mut self, path: &str, value: impl Into<Value>) -> Self {
		self.default_values.insert(path.to_string(), value.into());
		self
	}

	/// Hide the outermost braces in the editor
	pub fn hide_containing_braces(mut self) -> Self {
		self.hide_containing_braces = true;
		self.core.options.set_extra("hide_containing_braces", true);
		self
	}

	/// The stored document with defaults merged in, pretty-printed
	///
	/// # Examples
	///
	/// ```
	/// use regulate_core::AdminSettings;
	/// use regulate_forms::{BuildContext, Json};
	/// use regulate_test::TestRecord;
	///
	/// let record = TestRecord::existing("Post", 1).with_attribute("meta", r#"{"a":1}"#);
	/// let settings = AdminSettings::default();
	/// let cx = BuildContext::new(&record, &settings);
	///
	/// let meta = Json::new(&cx, "meta").unwrap().default_value("seo.index", true);
	/// assert_eq!(meta.calculated_value(), "{\n  \"a\": 1,\n  \"seo\": {\n    \"index\": true\n  }\n}");
	///
	/// let meta = Json::new(&cx, "meta").unwrap().hide_containing_braces();
	/// assert_eq!(meta.calculated_value(), "\"a\": 1");
	/// ```
	pub fn calculated_value(&self) -> String {
		let stored = self.core.value().clone();
		let raw_text = match &stored {
			Value::String(text) => Some(text.clone()),
			_ => None,
		};
		let mut document = decode_document(stored);

		// Text that is not JSON is shown as typed.
		if document.is_null()
			&& let Some(text) = raw_text
			&& !text.trim().is_empty()
		{
			return text;
		}

		if !self.default_values.is_empty() {
			if document.is_null() {
				document = Value::Object(Map::new());
			}
			for (path, value) in &self.default_values {
				let pointer: Vec<&str> = path.split('.').collect();
				if data_get(&document, &pointer).is_none() {
					data_set(&mut document, &pointer, value.clone());
				}
			}
		}

		if document.is_null() {
			return String::new();
		}
		let pretty = serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string());
		if self.hide_containing_braces {
			strip_containing_braces(&pretty)
		} else {
			pretty
		}
	}
}

/// Remove the outer braces or brackets of pretty-printed JSON and one level of indentation
fn strip_containing_braces(pretty: &str) -> String {
	let trimmed = pretty.trim();
	let wrapped = (trimmed.starts_with('{') && trimmed.ends_with('}'))
		|| (trimmed.starts_with('[') && trimmed.ends_with(']'));
	if !wrapped {
		return pretty.to_string();
	}
	let inner = &trimmed[1..trimmed.len() - 1];
	inner
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(|line| line.strip_prefix(INDENT).unwrap_or(line))
		.collect::<Vec<_>>()
		.join("\n")
}

impl ManageableField for Json {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"json"
	}

	fn post_constructed(&mut self, _settings: &AdminSettings) {
		self.core.rules.push("json");
	}

	/// Restore hidden braces: object form first, then array form
	fn pre_validation(&mut self, raw: Option<&Value>, _input: &SubmittedInput) -> Option<Value> {
		if !self.hide_containing_braces {
			return None;
		}
		let text = raw?.as_str()?.trim();
		if text.is_empty() {
			return None;
		}
		let corrected = [format!("{{{}}}", text), format!("[{}]", text)]
			.into_iter()
			.find_map(|candidate| serde_json::from_str::<Value>(&candidate).ok())?;
		tracing::debug!(field = %self.core.name(), "restored containing braces");
		Some(Value::String(corrected.to_string()))
	}

	fn apply_submitted_value(
		&mut self,
		_input: &SubmittedInput,
		raw: Option<&Value>,
		_cx: &ApplyContext<'_>,
	) -> FieldResult<Applied> {
		let document = match raw {
			None | Some(Value::Null) => return Ok(Applied::Set(Value::Null)),
			Some(Value::String(text)) if text.trim().is_empty() => {
				return Ok(Applied::Set(Value::Null));
			}
			Some(Value::String(text)) => {
				serde_json::from_str::<Value>(text).map_err(|e| FieldError::InvalidJson {
					field: self.core.encoded_name().to_string(),
					message: format!(
						"The {} field must contain valid JSON ({}).",
						self.message_label(),
						e
					),
				})?
			}
			Some(structured) => structured.clone(),
		};
		Ok(Applied::Set(encode_document(self.core.path(), document)))
	}

	fn display_value(&self) -> Value {
		Value::String(self.calculated_value())
	}
}
