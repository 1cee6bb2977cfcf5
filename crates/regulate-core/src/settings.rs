//! Admin panel settings
//!
//! Settings are plain serde structs loaded from TOML. Every section has a
//! `Default`, so a partial file only overrides what it names.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level settings for the admin panel
///
/// # Examples
///
/// ```
/// use regulate_core::AdminSettings;
///
/// let settings = AdminSettings::from_toml_str(r#"
/// [monetary]
/// multiplier = 1000
/// decimal_places = 3
/// "#).unwrap();
///
/// assert_eq!(settings.monetary.multiplier, 1000);
/// assert_eq!(settings.browse.per_page, 20);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdminSettings {
	pub uploads: UploadSettings,
	pub monetary: MonetarySettings,
	pub browse: BrowseSettings,
	pub password: PasswordSettings,
	pub templates: TemplateSettings,
}

/// Upload disk settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UploadSettings {
	/// Filesystem root of the public disk
	pub public_root: PathBuf,
	/// URL prefix the public disk is served under
	pub public_url: String,
	/// Submitted value that asks a file field to remove its stored file
	pub remove_value: String,
}

impl Default for UploadSettings {
	fn default() -> Self {
		Self {
			public_root: PathBuf::from("public"),
			public_url: "/".to_string(),
			remove_value: "__remove__".to_string(),
		}
	}
}

/// Defaults for monetary fields
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonetarySettings {
	pub multiplier: u32,
	pub decimal_places: u32,
}

impl Default for MonetarySettings {
	fn default() -> Self {
		Self {
			multiplier: 100,
			decimal_places: 2,
		}
	}
}

/// Defaults for browse pages
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrowseSettings {
	pub per_page: usize,
	pub max_chars: Option<usize>,
	pub ellipsis: String,
}

impl Default for BrowseSettings {
	fn default() -> Self {
		Self {
			per_page: 20,
			max_chars: None,
			ellipsis: "...".to_string(),
		}
	}
}

/// Password field settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PasswordSettings {
	/// Complexity patterns, each applied through its own `regex:` rule.
	/// Every pattern must match for a password to be accepted.
	pub patterns: Vec<String>,
	/// Suffix of the checkbox input that gates password changes
	pub change_checkbox_suffix: String,
}

impl Default for PasswordSettings {
	fn default() -> Self {
		Self {
			patterns: vec![
				"[a-z]".to_string(),
				"[A-Z]".to_string(),
				"[0-9]".to_string(),
				"^.{8,}$".to_string(),
			],
			change_checkbox_suffix: "_change".to_string(),
		}
	}
}

/// Widget template settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TemplateSettings {
	/// Prefix of every widget template name
	pub prefix: String,
}

impl Default for TemplateSettings {
	fn default() -> Self {
		Self {
			prefix: "regulate".to_string(),
		}
	}
}

impl AdminSettings {
	/// Parse and validate settings from TOML text
	pub fn from_toml_str(text: &str) -> Result<Self> {
		let settings: Self = toml::from_str(text).map_err(|e| Error::Settings(e.to_string()))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Read, parse and validate a TOML settings file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|e| {
			Error::Settings(format!("Cannot read '{}': {}", path.display(), e))
		})?;
		tracing::debug!(path = %path.display(), "loading admin settings");
		Self::from_toml_str(&text)
	}

	/// Serialize back to TOML
	pub fn to_toml_string(&self) -> Result<String> {
		toml::to_string(self).map_err(|e| Error::Settings(e.to_string()))
	}

	/// Check cross-field constraints
	pub fn validate(&self) -> Result<()> {
		if self.monetary.multiplier == 0 {
			return Err(Error::Settings(
				"monetary.multiplier must be greater than zero".to_string(),
			));
		}
		if self.browse.per_page == 0 {
			return Err(Error::Settings(
				"browse.per_page must be greater than zero".to_string(),
			));
		}
		if self.uploads.remove_value.is_empty() {
			return Err(Error::Settings(
				"uploads.remove_value must not be empty".to_string(),
			));
		}
		for pattern in &self.password.patterns {
			if pattern.contains('|') {
				return Err(Error::Settings(format!(
					"password pattern '{}' must not contain '|'",
					pattern
				)));
			}
			regex::Regex::new(pattern).map_err(|e| {
				Error::Settings(format!("password pattern '{}' is invalid: {}", pattern, e))
			})?;
		}
		Ok(())
	}
}
