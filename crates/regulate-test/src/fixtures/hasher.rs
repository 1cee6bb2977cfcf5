use regulate_core::{PasswordHasher, Result};

/// Reversible hasher producing `plain:<password>`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
	fn hash(&self, password: &str) -> Result<String> {
		Ok(format!("plain:{}", password))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool> {
		Ok(hash.strip_prefix("plain:") == Some(password))
	}
}
