//! Reading and writing field values through a [`FieldPath`]
//!
//! Reads never mutate the model and degrade gracefully: a missing related
//! record resolves to `""`, a missing JSON key to `null`. Writes are the
//! inverse of reads; JSON-path writes merge into the parent column instead
//! of replacing it.

use crate::path::FieldPath;
use regulate_core::{Error, Model, Result};
use serde_json::{Map, Value};

/// Resolve the current value of `path` on `model`.
///
/// Only an unknown relation (a configuration mistake) is an error.
///
/// # Examples
///
/// ```
/// use regulate_forms::{FieldPath, resolver};
/// use regulate_test::TestRecord;
/// use serde_json::json;
///
/// let post = TestRecord::new("Post")
///     .with_attribute("meta", r#"{"seo":{"title":"Hello"}}"#)
///     .with_empty_relation("author");
///
/// let title = FieldPath::parse("meta->seo->title").unwrap();
/// assert_eq!(resolver::resolve(&post, &title).unwrap(), json!("Hello"));
///
/// let author = FieldPath::parse("author.name").unwrap();
/// assert_eq!(resolver::resolve(&post, &author).unwrap(), json!(""));
/// ```
pub fn resolve(model: &dyn Model, path: &FieldPath) -> Result<Value> {
	match path {
		FieldPath::Column(column) => Ok(model.get_attribute(column).unwrap_or(Value::Null)),
		FieldPath::Relation { relation, column } => match model.relation(relation)? {
			Some(related) => Ok(related.get_attribute(column).unwrap_or(Value::Null)),
			None => {
				tracing::debug!(
					model = model.model_name(),
					relation = %relation,
					"relation has no record, resolving to empty string"
				);
				Ok(Value::String(String::new()))
			}
		},
		FieldPath::Json { base, pointer } => {
			let raw = match base.relation() {
				None => model.get_attribute(base.column()),
				Some(relation) => match model.relation(relation)? {
					Some(related) => related.get_attribute(base.column()),
					None => None,
				},
			};
			let document = raw.map(decode_document).unwrap_or(Value::Null);
			Ok(data_get(&document, pointer).cloned().unwrap_or(Value::Null))
		}
	}
}

/// Write `value` to `path` on `model`.
///
/// JSON paths decode the parent column (absent or null counts as `{}`), create
/// intermediate objects as needed, set the leaf and write the column back in
/// the representation it was read in.
pub fn assign(model: &mut dyn Model, path: &FieldPath, value: Value) -> Result<()> {
	let target = target_mut(model, path.relation())?;
	match path {
		FieldPath::Column(column) | FieldPath::Relation { column, .. } => {
			target.set_attribute(column, value);
		}
		FieldPath::Json { base, pointer } => {
			let column = base.column();
			let (mut document, as_text) = match target.get_attribute(column) {
				None | Some(Value::Null) => (Value::Object(Map::new()), true),
				Some(Value::String(text)) if text.trim().is_empty() => {
					(Value::Object(Map::new()), true)
				}
				Some(Value::String(text)) => {
					let parsed = serde_json::from_str(&text).map_err(|e| {
						Error::Model(format!(
							"Column '{}' on '{}' does not hold valid JSON: {}",
							column,
							target.model_name(),
							e
						))
					})?;
					(parsed, true)
				}
				Some(structured) => (structured, false),
			};
			data_set(&mut document, pointer, value);
			let written = if as_text {
				Value::String(document.to_string())
			} else {
				document
			};
			tracing::debug!(column = %column, path = %path, "merged value into JSON column");
			target.set_attribute(column, written);
		}
	}
	Ok(())
}

fn target_mut<'a>(model: &'a mut dyn Model, relation: Option<&str>) -> Result<&'a mut dyn Model> {
	match relation {
		None => Ok(model),
		Some(relation) => {
			let model_name = model.model_name().to_string();
			model.relation_mut(relation)?.ok_or_else(|| {
				Error::Model(format!(
					"Cannot write through relation '{}' on '{}': no related record",
					relation, model_name
				))
			})
		}
	}
}

/// Decode a JSON column value. Text is parsed; anything else is taken as-is.
/// Malformed text decodes to `null`.
pub fn decode_document(raw: Value) -> Value {
	match raw {
		Value::String(text) if text.trim().is_empty() => Value::Null,
		Value::String(text) => match serde_json::from_str(&text) {
			Ok(value) => value,
			Err(e) => {
				tracing::debug!(error = %e, "JSON column is malformed, resolving to null");
				Value::Null
			}
		},
		other => other,
	}
}

/// Encode a document for writing through `path`
///
/// Columns receive minified JSON text. JSON paths receive the document
/// itself so it nests inside the parent column.
///
/// # Examples
///
/// ```
/// use regulate_forms::FieldPath;
/// use regulate_forms::resolver::encode_document;
/// use serde_json::json;
///
/// let column = FieldPath::parse("meta").unwrap();
/// assert_eq!(encode_document(&column, json!({"a": 1})), json!(r#"{"a":1}"#));
///
/// let nested = FieldPath::parse("meta->config").unwrap();
/// assert_eq!(encode_document(&nested, json!({"a": 1})), json!({"a": 1}));
/// ```
pub fn encode_document(path: &FieldPath, document: Value) -> Value {
	if path.is_json() {
		document
	} else {
		Value::String(document.to_string())
	}
}

/// Follow `pointer` through objects (by key) and arrays (by index)
///
/// # Examples
///
/// ```
/// use regulate_forms::resolver::data_get;
/// use serde_json::json;
///
/// let doc = json!({"links": [{"url": "https://example.com"}]});
/// assert_eq!(data_get(&doc, &["links", "0", "url"]), Some(&json!("https://example.com")));
/// assert_eq!(data_get(&doc, &["links", "3"]), None);
/// ```
pub fn data_get<'a, S: AsRef<str>>(value: &'a Value, pointer: &[S]) -> Option<&'a Value> {
	pointer
		.iter()
		.try_fold(value, |current, segment| match current {
			Value::Object(map) => map.get(segment.as_ref()),
			Value::Array(items) => segment
				.as_ref()
				.parse::<usize>()
				.ok()
				.and_then(|index| items.get(index)),
			_ => None,
		})
}

/// Set the value at `pointer`, creating intermediate objects.
///
/// Existing array elements are addressed by index; any other non-object on
/// the way is replaced by an object.
pub fn data_set<S: AsRef<str>>(value: &mut Value, pointer: &[S], new_value: Value) {
	let Some((first, rest)) = pointer.split_first() else {
		*value = new_value;
		return;
	};
	let segment = first.as_ref();

	if let Value::Array(items) = value
		&& let Ok(index) = segment.parse::<usize>()
		&& index < items.len()
	{
		data_set(&mut items[index], rest, new_value);
		return;
	}

	if !value.is_object() {
		*value = Value::Object(Map::new());
	}
	if let Value::Object(map) = value {
		let slot = map.entry(segment.to_string()).or_insert(Value::Null);
		data_set(slot, rest, new_value);
	}
}

/// Render a resolved value as plain text
///
/// Strings are used verbatim, `null` is empty, booleans become `1`/`0` and
/// everything else is serialized as JSON.
pub fn value_to_string(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(text) => text.clone(),
		Value::Bool(true) => "1".to_string(),
		Value::Bool(false) => "0".to_string(),
		Value::Number(number) => number.to_string(),
		other => other.to_string(),
	}
}
