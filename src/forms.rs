//! Manageable fields
//!
//! This module provides access to the field pipeline through the
//! `regulate::forms` namespace.
//!
//! ```
//! use regulate::forms::name_codec::{decode, encode};
//!
//! assert_eq!(decode(&encode("author.name")), "author.name");
//! ```

pub use regulate_forms::*;
