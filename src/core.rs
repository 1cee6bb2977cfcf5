//! Boundary types shared by every Regulate layer
//!
//! Models, storage disks, view rendering, password hashing and settings.

pub use regulate_core::*;
