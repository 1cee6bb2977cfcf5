//! Drop-down select

use crate::context::{BuildContext, RenderContext};
use crate::field::{FieldCore, ManageableField, base_template_data};
use crate::resolver::value_to_string;
use indexmap::IndexMap;
use regulate_core::{AdminSettings, Result};
use serde_json::{Value, json};

/// Select from a fixed, ordered set of items (key -> label)
#[derive(Debug)]
pub struct Select {
	core: FieldCore,
	items: IndexMap<String, String>,
	allow_unlisted: bool,
}

impl Select {
	/// Create a select over `items`. Submitted values must be one of the keys.
	///
	/// # Examples
	///
	/// ```
	/// use regulate_core::AdminSettings;
	/// use regulate_forms::{BuildContext, ManageableField, Select};
	/// use regulate_test::TestRecord;
	///
	/// let record = TestRecord::new("Post");
	/// let settings = AdminSettings::default();
	/// let cx = BuildContext::new(&record, &settings);
	///
	/// let status = Select::new(&cx, "status", [("draft", "Draft"), ("live", "Published")]).unwrap();
	/// assert_eq!(status.validation_rules().as_str(), "in:draft,live");
	/// ```
	pub fn new<K, V, I>(cx: &BuildContext<'_>, name: &str, items: I) -> Result<Self>
	where
		K: Into<String>,
		V: Into<String>,
		I: IntoIterator<Item = (K, V)>,
	{
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
			items: items
				.into_iter()
				.map(|(key, label)| (key.into(), label.into()))
				.collect(),
			allow_unlisted: false,
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Accept values that are not among the items
	pub fn allow_unlisted(mut self) -> Self {
		self.allow_unlisted = true;
		self.core.rules.remove("in");
		self
	}

	pub fn items(&self) -> &IndexMap<String, String> {
		&self.items
	}
}

impl ManageableField for Select {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"select"
	}

	fn post_constructed(&mut self, _settings: &AdminSettings) {
		if !self.allow_unlisted && !self.items.is_empty() {
			let keys: Vec<&str> = self.items.keys().map(String::as_str).collect();
			self.core.rules.push(&format!("in:{}", keys.join(",")));
		}
	}

	fn template_data(&self, cx: &RenderContext<'_>) -> Value {
		let mut data = base_template_data(self, cx);
		let selected = value_to_string(&data["value"]);
		data["items"] = self
			.items
			.iter()
			.map(|(key, label)| json!({"key": key, "label": label, "selected": *key == selected}))
			.collect();
		data
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::input::SubmittedInput;
	use crate::validation::validate;
	use crate::visibility::PageType;
	use regulate_test::{RecordingRenderer, TestRecord};
	use rstest::rstest;

	fn status(record: &TestRecord, settings: &AdminSettings) -> Select {
		Select::new(
			&BuildContext::new(record, settings),
			"status",
			[("draft", "Draft"), ("live", "Published")],
		)
		.unwrap()
	}

	#[rstest]
	#[case("live", true)]
	#[case("archived", false)]
	fn test_select_rejects_unlisted_values(#[case] submitted: &str, #[case] valid: bool) {
		// Arrange
		let record = TestRecord::new("Post");
		let settings = AdminSettings::default();
		let field = status(&record, &settings);
		let input = SubmittedInput::new().with("status", submitted);

		// Act
		let errors = validate(&field.validation_rules().rules().unwrap(), "status", "Status", &input);

		// Assert
		assert_eq!(errors.is_empty(), valid);
	}

	#[rstest]
	fn test_allow_unlisted_drops_in_rule() {
		// Arrange
		let record = TestRecord::new("Post");
		let settings = AdminSettings::default();

		// Act
		let field = status(&record, &settings).allow_unlisted();

		// Assert
		assert!(field.validation_rules().is_empty());
	}

	#[rstest]
	fn test_template_marks_selected_item() {
		// Arrange
		let record = TestRecord::existing("Post", 1).with_attribute("status", "live");
		let settings = AdminSettings::default();
		let field = status(&record, &settings);
		let renderer = RecordingRenderer::new("");
		let cx = RenderContext::new(&renderer, &settings, PageType::Edit);

		// Act
		let data = field.template_data(&cx);

		// Assert
		assert_eq!(
			data["items"],
			json!([
				{"key": "draft", "label": "Draft", "selected": false},
				{"key": "live", "label": "Published", "selected": true},
			])
		);
	}
}
