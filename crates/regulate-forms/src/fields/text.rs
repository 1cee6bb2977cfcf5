//! Single-line text input

use crate::context::BuildContext;
use crate::field::{FieldCore, ManageableField};
use regulate_core::{AdminSettings, Result};

/// Single-line input; the submitted value is stored as-is
#[derive(Debug)]
pub struct Text {
	core: FieldCore,
}

impl Text {
	/// Create a text field bound to `name`
	///
	/// # Examples
	///
	/// ```
	/// use regulate_core::AdminSettings;
	/// use regulate_forms::{BuildContext, ManageableField, Text};
	/// use regulate_test::TestRecord;
	///
	/// let record = TestRecord::existing("User", 1)
	///     .with_relation("profile", TestRecord::existing("Profile", 4).with_attribute("city", "Oslo"));
	/// let settings = AdminSettings::default();
	/// let cx = BuildContext::new(&record, &settings);
	///
	/// let city = Text::new(&cx, "profile.city").unwrap();
	/// assert_eq!(city.encoded_name(), "profile~city");
	/// assert_eq!(city.value(), "Oslo");
	/// assert_eq!(city.label().as_deref(), Some("City"));
	/// ```
	pub fn new(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Set the input `type` (`text`, `email`, `number`, `url`, ...)
	pub fn input_type(mut self, input_type: &str) -> Self {
		self.core.attributes.set("type", input_type);
		self
	}

	pub fn placeholder(mut self, placeholder: &str) -> Self {
		self.core.attributes.set("placeholder", placeholder);
		self
	}
}

impl ManageableField for Text {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"text"
	}

	fn post_constructed(&mut self, _settings: &AdminSettings) {
		self.core.attributes.set("type", "text");
	}
}
