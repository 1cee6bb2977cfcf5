//! Monetary amounts stored as integers in minor units

use crate::context::{ApplyContext, BuildContext};
use crate::error::{FieldError, FieldResult};
use crate::field::{Applied, FieldCore, ManageableField};
use crate::input::SubmittedInput;
use regulate_core::{AdminSettings, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

/// Monetary amount shown in major units and stored as an integer
///
/// With a multiplier of 100 and 2 decimal places, `1234` is shown as
/// `12.34` and a submitted `12.34` is stored as `1234`. Both directions
/// round half away from zero at the last significant place.
#[derive(Debug)]
pub struct MonetaryValue {
	core: FieldCore,
	multiplier: u32,
	decimal_places: u32,
}

impl MonetaryValue {
	/// # Examples
	///
	/// ```
	/// use regulate_core::AdminSettings;
	/// use regulate_forms::{BuildContext, ManageableField, MonetaryValue};
	/// use regulate_test::TestRecord;
	/// use serde_json::json;
	///
	/// let record = TestRecord::existing("Product", 1).with_attribute("price", 1234);
	/// let settings = AdminSettings::default();
	/// let cx = BuildContext::new(&record, &settings);
	///
	/// let price = MonetaryValue::new(&cx, "price").unwrap();
	/// assert_eq!(price.display_value(), json!("12.34"));
	/// assert_eq!(price.to_stored("12.34").unwrap(), Some(1234));
	/// ```
	pub fn new(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
			multiplier: cx.settings.monetary.multiplier,
			decimal_places: cx.settings.monetary.decimal_places,
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Factor between the shown and the stored amount
	pub fn multiplier(mut self, multiplier: u32) -> Self {
		self.multiplier = multiplier.max(1);
		self
	}

	pub fn decimal_places(mut self, decimal_places: u32) -> Self {
		self.decimal_places = decimal_places;
		self.sync_attributes();
		self
	}

	fn sync_attributes(&mut self) {
		let step = Decimal::new(1, self.decimal_places);
		self.core.attributes.set("step", step.to_string());
		self.core
			.options
			.set_extra("decimal_places", self.decimal_places);
	}

	/// Stored integer rendered in major units
	pub fn to_display(&self, stored: &Value) -> Option<String> {
		let stored = match stored {
			Value::Number(number) => {
				if let Some(int) = number.as_i64() {
					Decimal::from(int)
				} else if let Some(int) = number.as_u64() {
					Decimal::from(int)
				} else {
					Decimal::try_from(number.as_f64()?).ok()?
				}
			}
			Value::String(text) if !text.trim().is_empty() => Decimal::from_str(text.trim()).ok()?,
			_ => return None,
		};
		let mut shown = (stored / Decimal::from(self.multiplier))
			.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero);
		shown.rescale(self.decimal_places);
		Some(shown.to_string())
	}

	/// Submitted major-unit text converted to the stored integer
	///
	/// Returns `Ok(None)` for blank input.
	pub fn to_stored(&self, submitted: &str) -> FieldResult<Option<i64>> {
		let submitted = submitted.trim();
		if submitted.is_empty() {
			return Ok(None);
		}
		let amount = Decimal::from_str(submitted).map_err(|_| {
			FieldError::validation(
				self.core.encoded_name(),
				format!("The {} field must be a number.", self.message_label()),
			)
		})?;
		let stored = amount
			.checked_mul(Decimal::from(self.multiplier))
			.map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
			.and_then(|value| value.to_i64())
			.ok_or_else(|| {
				FieldError::validation(
					self.core.encoded_name(),
					format!("The {} field is out of range.", self.message_label()),
				)
			})?;
		Ok(Some(stored))
	}
}

impl ManageableField for MonetaryValue {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"monetary_value"
	}

	fn post_constructed(&mut self, _settings: &AdminSettings) {
		self.core.rules.push("numeric");
		self.core.attributes.set("type", "number");
		self.sync_attributes();
	}

	fn display_value(&self) -> Value {
		self.to_display(self.core.value())
			.map(Value::String)
			.unwrap_or(Value::Null)
	}

	fn apply_submitted_value(
		&mut self,
		_input: &SubmittedInput,
		raw: Option<&Value>,
		_cx: &ApplyContext<'_>,
	) -> FieldResult<Applied> {
		let text = match raw {
			None | Some(Value::Null) => return Ok(Applied::Set(Value::Null)),
			Some(Value::String(text)) => text.clone(),
			Some(other) => other.to_string(),
		};
		let stored = self.to_stored(&text)?;
		Ok(Applied::Set(stored.map(Value::from).unwrap_or(Value::Null)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use regulate_core::InMemoryStorage;
	use regulate_test::{PlainHasher, TestRecord};
	use rstest::rstest;
	use serde_json::json;

	fn price(stored: Value) -> MonetaryValue {
		let record = TestRecord::existing("Product", 1).with_attribute("price", stored);
		let settings = AdminSettings::default();
		MonetaryValue::new(&BuildContext::new(&record, &settings), "price").unwrap()
	}

	#[rstest]
	#[case(json!(1234), json!("12.34"))]
	#[case(json!(1200), json!("12.00"))]
	#[case(json!(-5), json!("-0.05"))]
	#[case(json!("99"), json!("0.99"))]
	#[case(Value::Null, Value::Null)]
	fn test_display(#[case] stored: Value, #[case] expected: Value) {
		assert_eq!(price(stored).display_value(), expected);
	}

	#[rstest]
	#[case("12.34", Some(1234))]
	#[case("12", Some(1200))]
	#[case(" 0.01 ", Some(1))]
	#[case("12.345", Some(1235))]
	#[case("12.344", Some(1234))]
	#[case("-12.345", Some(-1235))]
	#[case("", None)]
	fn test_to_stored(#[case] submitted: &str, #[case] expected: Option<i64>) {
		assert_eq!(price(Value::Null).to_stored(submitted).unwrap(), expected);
	}

	#[rstest]
	fn test_round_trip_has_no_drift() {
		// Arrange
		let field = price(json!(1234));

		// Act
		let shown = field.display_value();
		let stored = field.to_stored(shown.as_str().unwrap()).unwrap();

		// Assert
		assert_eq!(stored, Some(1234));
	}

	#[rstest]
	fn test_custom_multiplier_and_places() {
		// Arrange
		let field = price(json!(12345)).multiplier(1000).decimal_places(3);

		// Act & Assert
		assert_eq!(field.display_value(), json!("12.345"));
		assert_eq!(field.to_stored("12.345").unwrap(), Some(12345));
		assert_eq!(field.core().attributes.get("step"), Some("0.001"));
	}

	#[rstest]
	fn test_apply_non_number_is_validation_error() {
		// Arrange
		let mut field = price(Value::Null);
		let settings = AdminSettings::default();
		let storage = InMemoryStorage::new("/");
		let cx = ApplyContext::new(&storage, &PlainHasher, &settings);

		// Act
		let error = field
			.apply_submitted_value(&SubmittedInput::new(), Some(&json!("abc")), &cx)
			.unwrap_err();

		// Assert
		assert_eq!(error.to_string(), "The Price field must be a number.");
	}

	#[rstest]
	fn test_monetary_adds_numeric_rule() {
		assert_eq!(price(Value::Null).validation_rules().as_str(), "numeric");
	}
}
