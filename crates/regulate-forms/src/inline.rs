//! Inline validation chains

use serde_json::Value;
use std::fmt;

type InlineRule = Box<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Ordered inline validation callbacks.
///
/// Evaluated in registration order; the first failure is the result and
/// the remaining callbacks are not invoked.
///
/// # Examples
///
/// ```
/// use regulate_forms::InlineValidation;
/// use serde_json::json;
///
/// let mut chain = InlineValidation::default();
/// chain.push(|v| if v.is_string() { Ok(()) } else { Err("Must be text".into()) });
/// chain.push(|v| if v != "admin" { Ok(()) } else { Err("Reserved name".into()) });
///
/// assert_eq!(chain.run(&json!("ada")), Ok(()));
/// assert_eq!(chain.run(&json!("admin")), Err("Reserved name".to_string()));
/// ```
#[derive(Default)]
pub struct InlineValidation {
	rules: Vec<InlineRule>,
}

impl InlineValidation {
	pub fn push<F>(&mut self, rule: F)
	where
		F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.rules.push(Box::new(rule));
	}

	pub fn run(&self, value: &Value) -> Result<(), String> {
		self.rules.iter().try_for_each(|rule| rule(value))
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}
}

impl fmt::Debug for InlineValidation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InlineValidation")
			.field("rules", &self.rules.len())
			.finish()
	}
}
