//! Core boundary types for the Regulate admin panel
//!
//! The field pipeline in `regulate-forms` and the browse/upsert layer in
//! `regulate-admin` never talk to a database, a template engine or a disk
//! directly. They go through the collaborators defined here:
//!
//! - [`Model`]: attribute get/set by name, relation accessors, creation state
//! - [`Storage`]: a disk abstraction with `exists`, `put`, `delete`, `url`, `path`
//! - [`ViewRenderer`]: opaque `render(template, data) -> String`
//! - [`PasswordHasher`]: one-way digests for password fields
//! - [`AdminSettings`]: TOML-backed configuration

pub mod error;
pub mod hasher;
pub mod html;
pub mod model;
pub mod render;
pub mod settings;
pub mod storage;

pub use error::{Error, Result};
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use model::Model;
pub use render::{TeraRenderer, ViewRenderer};
pub use settings::AdminSettings;
pub use storage::{InMemoryStorage, LocalStorage, Storage};

/// Re-export commonly used types
pub mod prelude {
	pub use super::error::*;
	pub use super::hasher::*;
	pub use super::model::*;
	pub use super::render::*;
	pub use super::settings::*;
	pub use super::storage::*;
}
