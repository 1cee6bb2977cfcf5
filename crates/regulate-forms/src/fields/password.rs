//! Password input with a change checkbox

use crate::context::{ApplyContext, BuildContext, RenderContext};
use crate::error::FieldResult;
use crate::field::{Applied, FieldCore, ManageableField, base_template_data};
use crate::input::SubmittedInput;
use crate::resolver::value_to_string;
use regulate_core::{AdminSettings, Result};
use serde_json::Value;

/// Password field storing a one-way hash
///
/// On edit pages the field only takes part in validation and apply when
/// its change checkbox (`<encoded name>_change` by default) is ticked;
/// otherwise the stored hash is left untouched. The widget never shows the
/// stored value.
#[derive(Debug)]
pub struct Password {
	core: FieldCore,
	change_key: String,
}

impl Password {
	/// # Examples
	///
	/// ```
	/// use regulate_core::AdminSettings;
	/// use regulate_forms::{BuildContext, ManageableField, Password};
	/// use regulate_test::TestRecord;
	///
	/// let settings = AdminSettings::default();
	///
	/// let new_user = TestRecord::new("User");
	/// let password = Password::new(&BuildContext::new(&new_user, &settings), "password").unwrap();
	/// assert!(password.validation_rules().as_str().starts_with("required|regex:"));
	///
	/// let existing = TestRecord::existing("User", 1).with_attribute("password", "hash");
	/// let password = Password::new(&BuildContext::new(&existing, &settings), "password").unwrap();
	/// assert!(password.validation_rules().as_str().starts_with("required_if:password_change,"));
	/// assert_eq!(password.change_key(), "password_change");
	/// ```
	pub fn new(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
			change_key: String::new(),
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Input name of the change checkbox
	pub fn change_key(&self) -> &str {
		&self.change_key
	}

	/// Whether this submission sets a new password
	pub fn is_changing(&self, input: &SubmittedInput) -> bool {
		self.core.is_creating() || input.is_checked(&self.change_key)
	}
}

impl ManageableField for Password {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"password"
	}

	fn post_constructed(&mut self, settings: &AdminSettings) {
		self.change_key = self
			.core
			.companion_key(&settings.password.change_checkbox_suffix);
		self.core.options.ignore_old = true;
		self.core.attributes.set("type", "password");
		self.core.attributes.set("value", "");
		self.core.attributes.set("autocomplete", "new-password");

		if self.core.is_creating() {
			self.core.rules.push("required");
		} else {
			let rule = format!("required_if:{},1,on,true", self.change_key);
			self.core.rules.push(&rule);
		}
		for pattern in &settings.password.patterns {
			self.core.rules.push(&format!("regex:{}", pattern));
		}
	}

	fn skip_validation(&self, input: &SubmittedInput) -> bool {
		!self.is_changing(input)
	}

	fn apply_submitted_value(
		&mut self,
		input: &SubmittedInput,
		raw: Option<&Value>,
		cx: &ApplyContext<'_>,
	) -> FieldResult<Applied> {
		if !self.is_changing(input) {
			tracing::debug!(field = %self.core.name(), "password unchanged, keeping stored hash");
			return Ok(Applied::Skip);
		}
		let plain = raw.map(value_to_string).unwrap_or_default();
		let hash = cx.hasher.hash(&plain)?;
		Ok(Applied::Set(Value::String(hash)))
	}

	fn display_value(&self) -> Value {
		Value::String(String::new())
	}

	fn template_data(&self, cx: &RenderContext<'_>) -> Value {
		let mut data = base_template_data(self, cx);
		data["change_key"] = Value::String(self.change_key.clone());
		data["creating"] = Value::Bool(self.core.is_creating());
		data
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::validation::validate;
	use crate::visibility::PageType;
	use regulate_core::InMemoryStorage;
	use regulate_test::{PlainHasher, RecordingRenderer, TestRecord};
	use rstest::rstest;
	use serde_json::json;

	fn edit_password(settings: &AdminSettings) -> Password {
		let record = TestRecord::existing("User", 1).with_attribute("password", "stored-hash");
		Password::new(&BuildContext::new(&record, settings), "password").unwrap()
	}

	#[rstest]
	#[case(SubmittedInput::new().with("password", "Secret123"), Applied::Skip)]
	#[case(
		SubmittedInput::new().with("password", "Secret123").with("password_change", "0"),
		Applied::Skip
	)]
	#[case(
		SubmittedInput::new().with("password", "Secret123").with("password_change", "1"),
		Applied::Set(json!("plain:Secret123"))
	)]
	#[case(
		SubmittedInput::new().with("password", "Secret123").with("password_change", "on"),
		Applied::Set(json!("plain:Secret123"))
	)]
	fn test_edit_apply_is_gated_by_checkbox(#[case] input: SubmittedInput, #[case] expected: Applied) {
		// Arrange
		let settings = AdminSettings::default();
		let mut field = edit_password(&settings);
		let storage = InMemoryStorage::new("/");
		let cx = ApplyContext::new(&storage, &PlainHasher, &settings);

		// Act
		let applied = field
			.apply_submitted_value(&input, input.get("password"), &cx)
			.unwrap();

		// Assert
		assert_eq!(applied, expected);
	}

	#[rstest]
	fn test_create_always_changes() {
		// Arrange
		let settings = AdminSettings::default();
		let record = TestRecord::new("User");
		let field = Password::new(&BuildContext::new(&record, &settings), "password").unwrap();

		// Act & Assert
		assert!(!field.skip_validation(&SubmittedInput::new()));
	}

	#[rstest]
	fn test_unchecked_edit_skips_validation() {
		// Arrange
		let settings = AdminSettings::default();
		let field = edit_password(&settings);

		// Act & Assert
		assert!(field.skip_validation(&SubmittedInput::new().with("password", "")));
		assert!(!field.skip_validation(&SubmittedInput::new().with("password_change", "1")));
	}

	#[rstest]
	#[case("weak", 3)]
	#[case("alllowercase1", 1)]
	#[case("Str0ngEnough", 0)]
	fn test_complexity_rules(#[case] password: &str, #[case] failures: usize) {
		// Arrange
		let settings = AdminSettings::default();
		let field = edit_password(&settings);
		let input = SubmittedInput::new()
			.with("password", password)
			.with("password_change", "1");

		// Act
		let errors = validate(
			&field.validation_rules().rules().unwrap(),
			"password",
			"Password",
			&input,
		);

		// Assert
		assert_eq!(errors.len(), failures);
	}

	#[rstest]
	fn test_checked_but_empty_is_required() {
		// Arrange
		let settings = AdminSettings::default();
		let field = edit_password(&settings);
		let input = SubmittedInput::new()
			.with("password", "")
			.with("password_change", "1");

		// Act
		let errors = validate(
			&field.validation_rules().rules().unwrap(),
			"password",
			"Password",
			&input,
		);

		// Assert
		assert_eq!(errors, vec!["The Password field is required."]);
	}

	#[rstest]
	fn test_never_displays_stored_hash_or_old_input() {
		// Arrange
		let settings = AdminSettings::default();
		let field = edit_password(&settings);
		let renderer = RecordingRenderer::new("");
		let old = SubmittedInput::new().with("password", "typed");
		let cx = RenderContext::new(&renderer, &settings, PageType::Edit).with_old_input(&old);

		// Act
		let data = field.template_data(&cx);

		// Assert
		assert_eq!(data["value"], json!(""));
		assert_eq!(data["attributes"]["value"], json!(""));
		assert_eq!(data["change_key"], json!("password_change"));
	}
}
