use parking_lot::Mutex;
use regulate_core::{Result, ViewRenderer};
use serde_json::Value;

/// [`ViewRenderer`] that returns fixed output and records every call
///
/// ```
/// use regulate_core::ViewRenderer;
/// use regulate_test::RecordingRenderer;
/// use serde_json::json;
///
/// let renderer = RecordingRenderer::new("<input>");
/// assert_eq!(renderer.render("fields/text.html", &json!({"name": "title"})).unwrap(), "<input>");
/// assert_eq!(renderer.templates(), vec!["fields/text.html"]);
/// assert_eq!(renderer.last_data(), Some(json!({"name": "title"})));
/// ```
#[derive(Debug, Default)]
pub struct RecordingRenderer {
	output: String,
	calls: Mutex<Vec<(String, Value)>>,
}

impl RecordingRenderer {
	pub fn new(output: impl Into<String>) -> Self {
		Self {
			output: output.into(),
			calls: Mutex::new(Vec::new()),
		}
	}

	/// Names of the rendered templates, in call order
	pub fn templates(&self) -> Vec<String> {
		self.calls
			.lock()
			.iter()
			.map(|(template, _)| template.clone())
			.collect()
	}

	/// Data passed with the most recent call
	pub fn last_data(&self) -> Option<Value> {
		self.calls.lock().last().map(|(_, data)| data.clone())
	}

	/// Every `(template, data)` pair, in call order
	pub fn calls(&self) -> Vec<(String, Value)> {
		self.calls.lock().clone()
	}
}

impl ViewRenderer for RecordingRenderer {
	fn render(&self, template: &str, data: &Value) -> Result<String> {
		self.calls.lock().push((template.to_string(), data.clone()));
		Ok(self.output.clone())
	}
}
