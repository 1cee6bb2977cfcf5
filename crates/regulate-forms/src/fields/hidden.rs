//! Hidden input

use crate::context::BuildContext;
use crate::field::{FieldCore, ManageableField};
use regulate_core::{AdminSettings, Result};

/// Hidden input carrying a value through the form unchanged
#[derive(Debug)]
pub struct Hidden {
	core: FieldCore,
}

impl Hidden {
	pub fn new(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}
}

impl ManageableField for Hidden {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"hidden"
	}

	fn post_constructed(&mut self, _settings: &AdminSettings) {
		self.core.attributes.set("type", "hidden");
	}
}
