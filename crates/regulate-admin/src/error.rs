//! Error types for the browse and upsert layer

use regulate_forms::FieldError;
use thiserror::Error;

/// Admin layer error type
#[derive(Debug, Error)]
pub enum AdminError {
	/// No manageable model is registered under the alias
	#[error("Model '{0}' is not registered with admin")]
	ModelNotRegistered(String),

	/// A browse request that cannot be planned
	#[error("Invalid browse request: {0}")]
	InvalidRequest(String),

	#[error(transparent)]
	Core(#[from] regulate_core::Error),

	#[error(transparent)]
	Field(#[from] FieldError),
}

impl AdminError {
	/// Whether this error is a configuration mistake rather than a runtime failure
	pub fn is_configuration(&self) -> bool {
		match self {
			Self::Core(error) | Self::Field(FieldError::Core(error)) => error.is_configuration(),
			_ => false,
		}
	}
}

/// Result type for admin operations
pub type AdminResult<T> = Result<T, AdminError>;
