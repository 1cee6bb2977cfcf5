use crate::error::{Error, Result};

/// Password hasher trait
///
/// Password fields hash submitted values through this trait before they
/// reach the model. Hashing is one-way.
///
/// # Examples
///
/// ```
/// use regulate_core::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("correct horse").unwrap();
///
/// assert!(hasher.verify("correct horse", &hash).unwrap());
/// assert!(!hasher.verify("battery staple", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
	/// Hashes a password
	fn hash(&self, password: &str) -> Result<String>;

	/// Verifies a password against a hash
	fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Argon2id password hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString},
		};
		use rand::RngCore;

		let mut salt_bytes = [0u8; 16];
		rand::thread_rng().fill_bytes(&mut salt_bytes);

		let salt =
			SaltString::encode_b64(&salt_bytes).map_err(|e| Error::Hashing(e.to_string()))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| Error::Hashing(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHash, PasswordVerifier},
		};

		let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::Hashing(e.to_string()))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}
