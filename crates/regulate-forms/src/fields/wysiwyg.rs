//! Rich-text editor

use crate::context::BuildContext;
use crate::field::{FieldCore, ManageableField};
use regulate_core::Result;

/// Rich-text editor storing the submitted HTML as-is
#[derive(Debug)]
pub struct Wysiwyg {
	core: FieldCore,
}

impl Wysiwyg {
	pub fn new(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Editor toolbar preset exposed to the widget
	pub fn toolbar(mut self, toolbar: &str) -> Self {
		self.core.options.set_extra("toolbar", toolbar);
		self
	}
}

impl ManageableField for Wysiwyg {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"wysiwyg"
	}
}
