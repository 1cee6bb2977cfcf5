//! # Regulate Test
//!
//! Testing utilities for the Regulate admin panel.
//!
//! ## Features
//!
//! - **[`TestRecord`]**: in-memory [`Model`](regulate_core::Model) with relations and write counters
//! - **[`RecordingRenderer`]**: a [`ViewRenderer`](regulate_core::ViewRenderer) that records every call
//! - **[`PlainHasher`]**: a reversible stand-in for password hashing
//! - **[`MockStorage`]**: mockall-based [`Storage`](regulate_core::Storage) mock
//! - **rstest fixtures**: default settings and temporary storages
//!
//! ## Quick Start
//!
//! ```
//! use regulate_core::Model;
//! use regulate_test::TestRecord;
//! use serde_json::json;
//!
//! let post = TestRecord::existing("Post", 1)
//!     .with_attribute("title", "Hello")
//!     .with_relation("author", TestRecord::existing("User", 2).with_attribute("name", "Ada"));
//!
//! assert_eq!(post.get_attribute("title"), Some(json!("Hello")));
//! assert!(!post.is_being_created());
//! ```

pub mod fixtures;
pub mod logging;

pub use fixtures::{MockStorage, PlainHasher, RecordingRenderer, TestRecord};
pub use logging::init_test_logging;
