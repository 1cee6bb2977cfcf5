//! Submitted request input

use crate::name_codec;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// An uploaded file as received from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
	pub original_name: String,
	pub bytes: Vec<u8>,
}

impl UploadedFile {
	pub fn new(original_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		Self {
			original_name: original_name.into(),
			bytes: bytes.into(),
		}
	}

	/// Lower-cased extension of the original file name
	///
	/// # Examples
	///
	/// ```
	/// use regulate_forms::UploadedFile;
	///
	/// assert_eq!(UploadedFile::new("Photo.JPG", vec![]).extension().as_deref(), Some("jpg"));
	/// assert_eq!(UploadedFile::new("README", vec![]).extension(), None);
	/// ```
	pub fn extension(&self) -> Option<String> {
		Path::new(&self.original_name)
			.extension()
			.and_then(|ext| ext.to_str())
			.map(str::to_ascii_lowercase)
	}

	pub fn size(&self) -> usize {
		self.bytes.len()
	}
}

/// The working input set of one submission.
///
/// Values are keyed by encoded field name. Lookups accept either the raw
/// name (`author.name`) or its encoded form (`author~name`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubmittedInput {
	values: IndexMap<String, Value>,
	#[serde(skip)]
	files: HashMap<String, UploadedFile>,
}

impl SubmittedInput {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.values.insert(key.into(), value.into());
		self
	}

	/// Builder-style file insert
	pub fn with_file(mut self, key: impl Into<String>, file: UploadedFile) -> Self {
		self.files.insert(key.into(), file);
		self
	}

	/// Look up a value by raw or encoded name
	///
	/// # Examples
	///
	/// ```
	/// use regulate_forms::SubmittedInput;
	/// use serde_json::json;
	///
	/// let input = SubmittedInput::new().with("author~name", "Ada");
	/// assert_eq!(input.get("author.name"), Some(&json!("Ada")));
	/// assert_eq!(input.get("author~name"), Some(&json!("Ada")));
	/// ```
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values
			.get(name)
			.or_else(|| self.values.get(&name_codec::encode(name)))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn set(&mut self, key: impl Into<String>, value: Value) {
		self.values.insert(key.into(), value);
	}

	/// Replace a value with a corrected one so later validation sees the correction
	pub fn force_merge(&mut self, key: &str, value: Value) {
		tracing::debug!(field = %key, "merging corrected value into submitted input");
		self.values.insert(key.to_string(), value);
	}

	pub fn remove(&mut self, name: &str) -> Option<Value> {
		self.values
			.shift_remove(name)
			.or_else(|| self.values.shift_remove(&name_codec::encode(name)))
	}

	/// Look up an uploaded file by raw or encoded name
	pub fn file(&self, name: &str) -> Option<&UploadedFile> {
		self.files
			.get(name)
			.or_else(|| self.files.get(&name_codec::encode(name)))
	}

	/// Whether a checkbox-like input is ticked (`1`, `on`, `true`)
	pub fn is_checked(&self, name: &str) -> bool {
		match self.get(name) {
			Some(Value::Bool(checked)) => *checked,
			Some(Value::Number(number)) => number.as_i64() == Some(1),
			Some(Value::String(text)) => matches!(text.as_str(), "1" | "on" | "true"),
			_ => false,
		}
	}

	pub fn values(&self) -> &IndexMap<String, Value> {
		&self.values
	}

	pub fn into_values(self) -> IndexMap<String, Value> {
		self.values
	}
}

impl FromIterator<(String, Value)> for SubmittedInput {
	fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
		Self {
			values: iter.into_iter().collect(),
			files: HashMap::new(),
		}
	}
}
