//! Multi-line text input

use crate::context::BuildContext;
use crate::field::{FieldCore, ManageableField};
use regulate_core::{AdminSettings, Result};

const DEFAULT_ROWS: u32 = 5;

/// Multi-line input; the submitted value is stored as-is
#[derive(Debug)]
pub struct TextArea {
	core: FieldCore,
}

impl TextArea {
	pub fn new(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Number of visible rows
	pub fn rows(mut self, rows: u32) -> Self {
		self.core.options.set_extra("rows", rows);
		self
	}
}

impl ManageableField for TextArea {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"text_area"
	}

	fn post_constructed(&mut self, _settings: &AdminSettings) {
		self.core.options.set_extra("rows", DEFAULT_ROWS);
	}
}
