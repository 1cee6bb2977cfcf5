//! Error types shared by every Regulate crate

/// Errors raised by the core collaborators.
///
/// Configuration errors are fatal: they indicate a programming mistake
/// (a missing `path` option, an unknown relation) and are raised at field
/// construction time instead of being deferred to a request.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Configuration error: {0}")]
	Configuration(String),

	#[error("Model '{model}' has no relation named '{relation}'")]
	UnknownRelation { model: String, relation: String },

	#[error("Storage error: {0}")]
	Storage(#[from] std::io::Error),

	#[error("Template error: {0}")]
	Template(#[from] tera::Error),

	#[error("Hashing error: {0}")]
	Hashing(String),

	#[error("Model error: {0}")]
	Model(String),

	#[error("Settings error: {0}")]
	Settings(String),
}

impl Error {
	/// Shorthand for [`Error::Configuration`]
	pub fn configuration(message: impl Into<String>) -> Self {
		Self::Configuration(message.into())
	}

	/// Whether this error is a configuration mistake rather than a runtime failure
	pub fn is_configuration(&self) -> bool {
		matches!(
			self,
			Self::Configuration(_) | Self::UnknownRelation { .. } | Self::Settings(_)
		)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
