//! Field-level errors

/// Errors raised while validating or applying a submitted field value.
///
/// Every variant except [`FieldError::Core`] is tied to the originating
/// field and is surfaced to the form as a human-readable message.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
	#[error("{message}")]
	Validation { field: String, message: String },

	#[error("{message}")]
	InvalidJson { field: String, message: String },

	#[error("{message}")]
	Upload { field: String, message: String },

	#[error(transparent)]
	Core(#[from] regulate_core::Error),
}

impl FieldError {
	pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Validation {
			field: field.into(),
			message: message.into(),
		}
	}

	pub fn upload(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Upload {
			field: field.into(),
			message: message.into(),
		}
	}

	/// Encoded name of the field this error belongs to, if any
	pub fn field(&self) -> Option<&str> {
		match self {
			Self::Validation { field, .. }
			| Self::InvalidJson { field, .. }
			| Self::Upload { field, .. } => Some(field),
			Self::Core(_) => None,
		}
	}
}

pub type FieldResult<T> = Result<T, FieldError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_field_error_exposes_field_and_message() {
		// Arrange
		let error = FieldError::validation("title", "The Title field is required.");

		// Act & Assert
		assert_eq!(error.field(), Some("title"));
		assert_eq!(error.to_string(), "The Title field is required.");
	}

	#[rstest]
	fn test_core_error_has_no_field() {
		// Arrange
		let error: FieldError = regulate_core::Error::configuration("boom").into();

		// Act & Assert
		assert_eq!(error.field(), None);
		assert_eq!(error.to_string(), "Configuration error: boom");
	}
}
