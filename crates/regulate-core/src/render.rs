//! View-rendering collaborator
//!
//! Fields hand a template name and a JSON data map to a [`ViewRenderer`]
//! and treat the returned markup as opaque.

use crate::error::{Error, Result};
use serde_json::Value;
use tera::{Context, Tera};

/// Renders a named template with a data map
pub trait ViewRenderer: Send + Sync {
	fn render(&self, template: &str, data: &Value) -> Result<String>;
}

/// [`ViewRenderer`] backed by a Tera instance
///
/// # Examples
///
/// ```
/// use regulate_core::{TeraRenderer, ViewRenderer};
/// use serde_json::json;
///
/// let mut renderer = TeraRenderer::empty();
/// renderer
///     .add_raw_template("hello.html", "<p>{{ name }}</p>")
///     .unwrap();
///
/// let html = renderer.render("hello.html", &json!({"name": "<b>"})).unwrap();
/// assert_eq!(html, "<p>&lt;b&gt;</p>");
/// ```
pub struct TeraRenderer {
	tera: Tera,
}

impl TeraRenderer {
	/// Load every template matching `glob` (e.g. `"templates/**/*.html"`)
	pub fn new(glob: &str) -> Result<Self> {
		Ok(Self {
			tera: Tera::new(glob)?,
		})
	}

	/// A renderer with no templates registered
	pub fn empty() -> Self {
		Self {
			tera: Tera::default(),
		}
	}

	pub fn from_tera(tera: Tera) -> Self {
		Self { tera }
	}

	pub fn add_raw_template(&mut self, name: &str, content: &str) -> Result<()> {
		self.tera.add_raw_template(name, content)?;
		Ok(())
	}

	/// Register several templates at once so they may extend each other
	pub fn add_raw_templates(&mut self, templates: &[(&str, &str)]) -> Result<()> {
		self.tera.add_raw_templates(templates.iter().copied())?;
		Ok(())
	}

	pub fn has_template(&self, name: &str) -> bool {
		self.tera.get_template_names().any(|n| n == name)
	}
}

impl ViewRenderer for TeraRenderer {
	fn render(&self, template: &str, data: &Value) -> Result<String> {
		let context = match data {
			Value::Null => Context::new(),
			Value::Object(_) => Context::from_value(data.clone())?,
			_ => {
				return Err(Error::configuration(format!(
					"Template data for '{}' must be an object",
					template
				)));
			}
		};
		Ok(self.tera.render(template, &context)?)
	}
}
