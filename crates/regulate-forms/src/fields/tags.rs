//! Free-form tag list

use crate::context::{ApplyContext, BuildContext, RenderContext};
use crate::error::FieldResult;
use crate::field::{Applied, FieldCore, ManageableField, base_template_data};
use crate::input::SubmittedInput;
use crate::resolver::{encode_document, value_to_string};
use regulate_core::Result;
use serde_json::Value;

/// Tag list stored as JSON array text, or as an array under a JSON path
///
/// Accepts an array or a comma-separated string; tags are trimmed and
/// de-duplicated, keeping first-seen order.
#[derive(Debug)]
pub struct Tags {
	core: FieldCore,
}

impl Tags {
	pub fn new(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// The current tags
	pub fn tags(&self) -> Vec<String> {
		parse_tags(self.core.value())
	}
}

/// Normalise a stored or submitted tag value
///
/// # Examples
///
/// ```
/// use regulate_forms::fields::tags::parse_tags;
/// use serde_json::json;
///
/// assert_eq!(parse_tags(&json!(" rust, web ,rust,")), vec!["rust", "web"]);
/// assert_eq!(parse_tags(&json!(r#"["a","b"]"#)), vec!["a", "b"]);
/// assert_eq!(parse_tags(&json!(["x", " y "])), vec!["x", "y"]);
/// ```
pub fn parse_tags(value: &Value) -> Vec<String> {
	let raw: Vec<String> = match value {
		Value::Array(items) => items.iter().map(value_to_string).collect(),
		Value::String(text) if text.trim_start().starts_with('[') => {
			match serde_json::from_str::<Vec<Value>>(text) {
				Ok(items) => items.iter().map(value_to_string).collect(),
				Err(_) => text.split(',').map(str::to_string).collect(),
			}
		}
		Value::String(text) => text.split(',').map(str::to_string).collect(),
		Value::Null => Vec::new(),
		other => vec![value_to_string(other)],
	};

	let mut tags: Vec<String> = Vec::new();
	for tag in raw {
		let tag = tag.trim();
		if !tag.is_empty() && !tags.iter().any(|seen| seen == tag) {
			tags.push(tag.to_string());
		}
	}
	tags
}

impl ManageableField for Tags {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"tags"
	}

	fn display_value(&self) -> Value {
		Value::String(self.tags().join(", "))
	}

	fn apply_submitted_value(
		&mut self,
		_input: &SubmittedInput,
		raw: Option<&Value>,
		_cx: &ApplyContext<'_>,
	) -> FieldResult<Applied> {
		let tags = parse_tags(raw.unwrap_or(&Value::Null));
		Ok(Applied::Set(encode_document(self.core.path(), Value::from(tags))))
	}

	fn template_data(&self, cx: &RenderContext<'_>) -> Value {
		let mut data = base_template_data(self, cx);
		data["tags"] = Value::from(parse_tags(&data["value"]));
		data
	}
}
