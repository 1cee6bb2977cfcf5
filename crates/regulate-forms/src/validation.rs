//! Rule strings and the standard rule validator
//!
//! Rules accumulate as a pipe-joined string (`required|string|max:255`).
//! The string is parsed into [`Rule`]s when validation runs; an unknown rule
//! name is a configuration error.

use crate::input::SubmittedInput;
use crate::resolver::value_to_string;
use regex::Regex;
use regulate_core::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

// Local part, `@`, a domain with at least one dot.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("EMAIL_REGEX: invalid regex pattern")
});

/// Pipe-joined validation rules of one field
///
/// # Examples
///
/// ```
/// use regulate_forms::ValidationRules;
///
/// let mut rules = ValidationRules::default();
/// rules.push("required");
/// rules.push("string|max:255");
/// assert_eq!(rules.as_str(), "required|string|max:255");
///
/// rules.overwrite("nullable");
/// assert_eq!(rules.as_str(), "nullable");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRules(String);

impl ValidationRules {
	pub fn new(rules: impl Into<String>) -> Self {
		Self(rules.into())
	}

	/// Append rules, joining with `|`
	pub fn push(&mut self, rules: &str) {
		let rules = rules.trim_matches('|');
		if rules.is_empty() {
			return;
		}
		if !self.0.is_empty() {
			self.0.push('|');
		}
		self.0.push_str(rules);
	}

	/// Replace all rules
	pub fn overwrite(&mut self, rules: &str) {
		self.0 = rules.trim_matches('|').to_string();
	}

	/// Drop every rule with this name
	pub fn remove(&mut self, name: &str) {
		self.0 = self
			.segments()
			.filter(|segment| rule_name(segment) != name)
			.collect::<Vec<_>>()
			.join("|");
	}

	pub fn contains(&self, name: &str) -> bool {
		self.segments().any(|segment| rule_name(segment) == name)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Parse into rules
	pub fn rules(&self) -> Result<Vec<Rule>> {
		self.segments().map(Rule::parse).collect()
	}

	fn segments(&self) -> impl Iterator<Item = &str> {
		self.0.split('|').map(str::trim).filter(|s| !s.is_empty())
	}
}

impl fmt::Display for ValidationRules {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

fn rule_name(segment: &str) -> &str {
	segment.split_once(':').map_or(segment, |(name, _)| name)
}

/// One parsed validation rule
#[derive(Debug, Clone)]
pub enum Rule {
	Required,
	RequiredIf { field: String, values: Vec<String> },
	Nullable,
	String,
	Numeric,
	Integer,
	Boolean,
	Json,
	Email,
	Min(f64),
	Max(f64),
	Regex(Regex),
	In(Vec<String>),
	Confirmed,
}

impl Rule {
	/// Parse one `name[:parameters]` segment
	pub fn parse(segment: &str) -> Result<Self> {
		let (name, parameters) = match segment.split_once(':') {
			Some((name, parameters)) => (name, Some(parameters)),
			None => (segment, None),
		};
		let require = |what: &str| {
			parameters.filter(|p| !p.is_empty()).ok_or_else(|| {
				Error::configuration(format!("Rule '{}' requires {}", name, what))
			})
		};

		let rule = match name {
			"required" => Self::Required,
			"required_if" => {
				let mut parts = require("a field and value")?.split(',');
				let field = parts.next().unwrap_or_default().trim().to_string();
				let values: Vec<String> = parts.map(|v| v.trim().to_string()).collect();
				if field.is_empty() || values.is_empty() {
					return Err(Error::configuration(format!(
						"Rule '{}' requires a field and at least one value",
						segment
					)));
				}
				Self::RequiredIf { field, values }
			}
			"nullable" => Self::Nullable,
			"string" => Self::String,
			"numeric" => Self::Numeric,
			"integer" => Self::Integer,
			"boolean" => Self::Boolean,
			"json" => Self::Json,
			"email" => Self::Email,
			"min" => Self::Min(parse_bound(segment, require("a number")?)?),
			"max" => Self::Max(parse_bound(segment, require("a number")?)?),
			"regex" => {
				let pattern = require("a pattern")?;
				let regex = Regex::new(pattern).map_err(|e| {
					Error::configuration(format!("Rule '{}' has an invalid pattern: {}", segment, e))
				})?;
				Self::Regex(regex)
			}
			"in" => Self::In(
				require("a list of values")?
					.split(',')
					.map(|v| v.trim().to_string())
					.collect(),
			),
			"confirmed" => Self::Confirmed,
			other => {
				return Err(Error::configuration(format!(
					"Unknown validation rule '{}'",
					other
				)));
			}
		};
		Ok(rule)
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::Required => "required",
			Self::RequiredIf { .. } => "required_if",
			Self::Nullable => "nullable",
			Self::String => "string",
			Self::Numeric => "numeric",
			Self::Integer => "integer",
			Self::Boolean => "boolean",
			Self::Json => "json",
			Self::Email => "email",
			Self::Min(_) => "min",
			Self::Max(_) => "max",
			Self::Regex(_) => "regex",
			Self::In(_) => "in",
			Self::Confirmed => "confirmed",
		}
	}

	/// Implicit rules run even when the value is empty
	pub fn is_implicit(&self) -> bool {
		matches!(self, Self::Required | Self::RequiredIf { .. })
	}
}

fn parse_bound(segment: &str, text: &str) -> Result<f64> {
	text.trim().parse().map_err(|_| {
		Error::configuration(format!("Rule '{}' requires a numeric bound", segment))
	})
}

/// Whether a submitted value counts as empty (absent, null, blank or `[]`)
pub fn is_empty_value(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => true,
		Some(Value::String(text)) => text.trim().is_empty(),
		Some(Value::Array(items)) => items.is_empty(),
		_ => false,
	}
}

/// Validate the input under `name` against `rules`.
///
/// Returns every failure message. Non-implicit rules are skipped for empty
/// values.
///
/// # Examples
///
/// ```
/// use regulate_forms::{SubmittedInput, ValidationRules};
/// use regulate_forms::validation::validate;
///
/// let rules = ValidationRules::new("required|max:5").rules().unwrap();
/// let input = SubmittedInput::new().with("code", "toolong");
///
/// let errors = validate(&rules, "code", "Code", &input);
/// assert_eq!(errors, vec!["The Code field must not be greater than 5 characters."]);
/// ```
pub fn validate(rules: &[Rule], name: &str, label: &str, input: &SubmittedInput) -> Vec<String> {
	let value = input.get(name);
	let empty = is_empty_value(value);
	let numeric_context = rules
		.iter()
		.any(|rule| matches!(rule, Rule::Numeric | Rule::Integer));

	let mut errors = Vec::new();
	for rule in rules {
		if empty && !rule.is_implicit() {
			continue;
		}
		if let Some(message) = check(rule, value, empty, numeric_context, name, label, input) {
			tracing::debug!(field = %name, rule = rule.name(), "validation rule failed");
			errors.push(message);
		}
	}
	errors
}

fn check(
	rule: &Rule,
	value: Option<&Value>,
	empty: bool,
	numeric_context: bool,
	name: &str,
	label: &str,
	input: &SubmittedInput,
) -> Option<String> {
	let Some(value) = value else {
		return empty
			.then(|| implicit_failure(rule, label, input))
			.flatten();
	};
	let text = value_to_string(value);

	let passed = match rule {
		Rule::Required | Rule::RequiredIf { .. } => {
			return if empty {
				implicit_failure(rule, label, input)
			} else {
				None
			};
		}
		Rule::Nullable => true,
		Rule::String => value.is_string(),
		Rule::Numeric => as_number(value).is_some(),
		Rule::Integer => match value {
			Value::Number(number) => number.is_i64() || number.is_u64(),
			Value::String(text) => text.trim().parse::<i64>().is_ok(),
			_ => false,
		},
		Rule::Boolean => {
			value.is_boolean() || matches!(text.as_str(), "0" | "1" | "true" | "false")
		}
		Rule::Json => match value {
			Value::String(text) => serde_json::from_str::<Value>(text).is_ok(),
			Value::Object(_) | Value::Array(_) => true,
			_ => false,
		},
		Rule::Email => EMAIL_REGEX.is_match(&text),
		Rule::Min(bound) => size_of(value, numeric_context).is_some_and(|size| size >= *bound),
		Rule::Max(bound) => size_of(value, numeric_context).is_some_and(|size| size <= *bound),
		Rule::Regex(regex) => regex.is_match(&text),
		Rule::In(allowed) => match value {
			Value::Array(items) => items
				.iter()
				.all(|item| allowed.contains(&value_to_string(item))),
			_ => allowed.contains(&text),
		},
		Rule::Confirmed => {
			let confirmation = input.get(&format!("{}_confirmation", name));
			confirmation.map(value_to_string).as_deref() == Some(text.as_str())
		}
	};

	if passed {
		return None;
	}
	Some(match rule {
		Rule::String => format!("The {} field must be a string.", label),
		Rule::Numeric => format!("The {} field must be a number.", label),
		Rule::Integer => format!("The {} field must be an integer.", label),
		Rule::Boolean => format!("The {} field must be true or false.", label),
		Rule::Json => format!("The {} field must be a valid JSON string.", label),
		Rule::Email => format!("The {} field must be a valid email address.", label),
		Rule::Min(bound) => size_message(label, value, numeric_context, true, *bound),
		Rule::Max(bound) => size_message(label, value, numeric_context, false, *bound),
		Rule::Regex(_) => format!("The {} field format is invalid.", label),
		Rule::In(_) => format!("The selected {} is invalid.", label),
		Rule::Confirmed => format!("The {} field confirmation does not match.", label),
		Rule::Required | Rule::RequiredIf { .. } | Rule::Nullable => {
			format!("The {} field is invalid.", label)
		}
	})
}

fn implicit_failure(rule: &Rule, label: &str, input: &SubmittedInput) -> Option<String> {
	match rule {
		Rule::Required => Some(format!("The {} field is required.", label)),
		Rule::RequiredIf { field, values } => {
			let other = input.get(field).map(value_to_string).unwrap_or_default();
			values
				.contains(&other)
				.then(|| format!("The {} field is required.", label))
		}
		_ => None,
	}
}

fn as_number(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
		_ => None,
	}
}

fn size_of(value: &Value, numeric_context: bool) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64(),
		Value::String(text) if numeric_context => as_number(value).or(Some(text.chars().count() as f64)),
		Value::String(text) => Some(text.chars().count() as f64),
		Value::Array(items) => Some(items.len() as f64),
		Value::Object(map) => Some(map.len() as f64),
		Value::Bool(_) | Value::Null => None,
	}
}

fn size_message(label: &str, value: &Value, numeric_context: bool, lower: bool, bound: f64) -> String {
	match value {
		Value::String(_) if !numeric_context => {
			let verb = if lower { "must be at least" } else { "must not be greater than" };
			format!("The {} field {} {} characters.", label, verb, bound)
		}
		Value::Array(_) | Value::Object(_) => {
			let verb = if lower { "must have at least" } else { "must not have more than" };
			format!("The {} field {} {} items.", label, verb, bound)
		}
		_ => {
			let verb = if lower { "must be at least" } else { "must not be greater than" };
			format!("The {} field {} {}.", label, verb, bound)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn run(rules: &str, value: Value) -> Vec<String> {
		let rules = ValidationRules::new(rules).rules().unwrap();
		let input = SubmittedInput::new().with("field", value);
		validate(&rules, "field", "Field", &input)
	}

	#[rstest]
	fn test_push_skips_empty_and_trims_pipes() {
		// Arrange
		let mut rules = ValidationRules::default();

		// Act
		rules.push("");
		rules.push("|required|");
		rules.push("json");

		// Assert
		assert_eq!(rules.as_str(), "required|json");
	}

	#[rstest]
	fn test_remove_drops_every_rule_with_name() {
		// Arrange
		let mut rules = ValidationRules::new("required|regex:[a-z]|string|regex:[0-9]");

		// Act
		rules.remove("regex");

		// Assert
		assert_eq!(rules.as_str(), "required|string");
		assert!(!rules.contains("regex"));
		assert!(rules.contains("string"));
	}

	#[rstest]
	#[case("bogus")]
	#[case("min")]
	#[case("max:abc")]
	#[case("regex:(")]
	#[case("required_if:other")]
	fn test_bad_rules_are_configuration_errors(#[case] rules: &str) {
		// Act
		let result = ValidationRules::new(rules).rules();

		// Assert
		assert!(result.unwrap_err().is_configuration());
	}

	#[rstest]
	#[case("required", json!(""), vec!["The Field field is required."])]
	#[case("required", json!("   "), vec!["The Field field is required."])]
	#[case("required", json!([]), vec!["The Field field is required."])]
	#[case("required", json!("x"), vec![])]
	#[case("string|max:3", json!(""), vec![])]
	#[case("numeric", json!("12.5"), vec![])]
	#[case("numeric", json!("12,5"), vec!["The Field field must be a number."])]
	#[case("integer", json!("12"), vec![])]
	#[case("integer", json!("1.5"), vec!["The Field field must be an integer."])]
	#[case("boolean", json!("1"), vec![])]
	#[case("boolean", json!("yes"), vec!["The Field field must be true or false."])]
	#[case("json", json!(r#"{"a":1}"#), vec![])]
	#[case("json", json!("a: 1"), vec!["The Field field must be a valid JSON string."])]
	#[case("email", json!("ada@example.com"), vec![])]
	#[case("email", json!("ada"), vec!["The Field field must be a valid email address."])]
	#[case("min:3", json!("ab"), vec!["The Field field must be at least 3 characters."])]
	#[case("numeric|min:3", json!("2"), vec!["The Field field must be at least 3."])]
	#[case("numeric|max:10", json!("11"), vec!["The Field field must not be greater than 10."])]
	#[case("max:1", json!(["a", "b"]), vec!["The Field field must not have more than 1 items."])]
	#[case("regex:^[A-Z]", json!("abc"), vec!["The Field field format is invalid."])]
	#[case("in:a,b", json!("c"), vec!["The selected Field is invalid."])]
	#[case("in:a,b", json!(["a", "b"]), vec![])]
	#[case("string|min:8|regex:[0-9]", json!("short"), vec![
		"The Field field must be at least 8 characters.",
		"The Field field format is invalid.",
	])]
	fn test_validate(#[case] rules: &str, #[case] value: Value, #[case] expected: Vec<&str>) {
		// Act
		let errors = run(rules, value);

		// Assert
		assert_eq!(errors, expected);
	}

	#[rstest]
	#[case("1", vec!["The Password field is required."])]
	#[case("0", vec![])]
	fn test_required_if(#[case] checkbox: &str, #[case] expected: Vec<&str>) {
		// Arrange
		let rules = ValidationRules::new("required_if:password_change,1,on")
			.rules()
			.unwrap();
		let input = SubmittedInput::new()
			.with("password", "")
			.with("password_change", checkbox);

		// Act
		let errors = validate(&rules, "password", "Password", &input);

		// Assert
		assert_eq!(errors, expected);
	}

	#[rstest]
	fn test_required_if_with_absent_value() {
		// Arrange
		let rules = ValidationRules::new("required_if:kind,other").rules().unwrap();
		let input = SubmittedInput::new().with("kind", "other");

		// Act
		let errors = validate(&rules, "detail", "Detail", &input);

		// Assert
		assert_eq!(errors, vec!["The Detail field is required."]);
	}

	#[rstest]
	#[case("secret", vec![])]
	#[case("different", vec!["The Pin field confirmation does not match."])]
	fn test_confirmed(#[case] confirmation: &str, #[case] expected: Vec<&str>) {
		// Arrange
		let rules = ValidationRules::new("confirmed").rules().unwrap();
		let input = SubmittedInput::new()
			.with("pin", "secret")
			.with("pin_confirmation", confirmation);

		// Act
		let errors = validate(&rules, "pin", "Pin", &input);

		// Assert
		assert_eq!(errors, expected);
	}

	#[rstest]
	fn test_encoded_name_lookup() {
		// Arrange
		let rules = ValidationRules::new("required").rules().unwrap();
		let input = SubmittedInput::new().with("author~name", "Ada");

		// Act
		let errors = validate(&rules, "author.name", "Name", &input);

		// Assert
		assert!(errors.is_empty());
	}
}
