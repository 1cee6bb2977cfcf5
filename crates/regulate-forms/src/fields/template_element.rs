//! Arbitrary template rendered among the fields

use crate::context::{ApplyContext, BuildContext, RenderContext};
use crate::error::FieldResult;
use crate::field::{Applied, FieldCore, ManageableField, base_template_data};
use crate::input::SubmittedInput;
use indexmap::IndexMap;
use regulate_core::Result;
use serde_json::Value;

/// Renders a caller-supplied template; holds no value and is never
/// validated or applied
#[derive(Debug)]
pub struct TemplateElement {
	core: FieldCore,
	template: String,
	data: IndexMap<String, Value>,
}

impl TemplateElement {
	/// # Examples
	///
	/// ```
	/// use regulate_core::AdminSettings;
	/// use regulate_forms::{BuildContext, ManageableField, RenderContext, PageType, TemplateElement};
	/// use regulate_test::{RecordingRenderer, TestRecord};
	///
	/// let record = TestRecord::existing("Order", 1);
	/// let settings = AdminSettings::default();
	/// let notice = TemplateElement::new(&BuildContext::new(&record, &settings), "notice", "orders/notice.html")
	///     .unwrap()
	///     .with_data("level", "warning");
	///
	/// let renderer = RecordingRenderer::new("<p>notice</p>");
	/// let cx = RenderContext::new(&renderer, &settings, PageType::Edit);
	/// assert_eq!(notice.render(&cx).unwrap(), "<p>notice</p>");
	/// assert_eq!(renderer.templates(), vec!["orders/notice.html"]);
	/// ```
	pub fn new(cx: &BuildContext<'_>, name: &str, template: &str) -> Result<Self> {
		let mut field = Self {
			core: FieldCore::unbound(cx, name)?,
			template: template.to_string(),
			data: IndexMap::new(),
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Extra template variable
	pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.data.insert(key.into(), value.into());
		self
	}
}

impl ManageableField for TemplateElement {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"template_element"
	}

	fn skip_validation(&self, _input: &SubmittedInput) -> bool {
		true
	}

	fn apply_submitted_value(
		&mut self,
		_input: &SubmittedInput,
		_raw: Option<&Value>,
		_cx: &ApplyContext<'_>,
	) -> FieldResult<Applied> {
		Ok(Applied::Skip)
	}

	fn template_name(&self, _cx: &RenderContext<'_>) -> String {
		self.template.clone()
	}

	fn template_data(&self, cx: &RenderContext<'_>) -> Value {
		let mut data = base_template_data(self, cx);
		for (key, value) in &self.data {
			data[key.as_str()] = value.clone();
		}
		data
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::visibility::PageType;
	use regulate_core::{AdminSettings, InMemoryStorage};
	use regulate_test::{PlainHasher, RecordingRenderer, TestRecord};
	use rstest::rstest;
	use serde_json::json;

	fn element(record: &TestRecord) -> TemplateElement {
		let settings = AdminSettings::default();
		TemplateElement::new(&BuildContext::new(record, &settings), "summary", "orders/summary.html")
			.unwrap()
			.with_data("total", 42)
	}

	#[rstest]
	fn test_never_reads_the_model() {
		// Arrange
		let record = TestRecord::existing("Order", 1).with_attribute("summary", "stored");

		// Act
		let field = element(&record);

		// Assert
		assert_eq!(field.value(), &Value::Null);
	}

	#[rstest]
	fn test_always_skipped() {
		// Arrange
		let mut field = element(&TestRecord::new("Order"));
		let settings = AdminSettings::default();
		let storage = InMemoryStorage::new("/");
		let cx = ApplyContext::new(&storage, &PlainHasher, &settings);
		let input = SubmittedInput::new().with("summary", "posted");

		// Act
		let applied = field
			.apply_submitted_value(&input, input.get("summary"), &cx)
			.unwrap();

		// Assert
		assert!(field.skip_validation(&input));
		assert_eq!(applied, Applied::Skip);
	}

	#[rstest]
	fn test_template_data_includes_custom_values() {
		// Arrange
		let field = element(&TestRecord::new("Order"));
		let settings = AdminSettings::default();
		let renderer = RecordingRenderer::new("");
		let cx = RenderContext::new(&renderer, &settings, PageType::Create);

		// Act
		let data = field.template_data(&cx);

		// Assert
		assert_eq!(data["total"], json!(42));
		assert_eq!(data["kind"], json!("template_element"));
	}
}
