//! Browse and upsert layer for the Regulate admin panel
//!
//! This crate sits between a web framework and the field pipeline of
//! `regulate-forms`:
//! - [`ManageableModel`] describes one model's field set, browse columns and filters
//! - [`Registry`] looks models up by URL alias
//! - [`browse`] renders list columns, applies filters to a [`QueryBuilder`](browse::QueryBuilder) and pages results
//! - [`upsert()`] validates a submission, applies it to the model and saves
//!
//! ## Example
//!
//! ```
//! use regulate_admin::{ManageableModel, UpsertOutcome, build_context, upsert};
//! use regulate_core::{AdminSettings, InMemoryStorage, Model, Result};
//! use regulate_forms::{ApplyContext, BuildContext, Configure, ManageableField, SubmittedInput, Text};
//! use regulate_test::{PlainHasher, TestRecord};
//!
//! struct Authors;
//!
//! impl ManageableModel for Authors {
//!     fn url_alias(&self) -> &str {
//!         "authors"
//!     }
//!
//!     fn display_name(&self) -> &str {
//!         "Authors"
//!     }
//!
//!     fn fields(&self, cx: &BuildContext<'_>) -> Result<Vec<Box<dyn ManageableField>>> {
//!         Ok(vec![Text::new(cx, "name")?.required().boxed()])
//!     }
//! }
//!
//! let settings = AdminSettings::default();
//! let storage = InMemoryStorage::new("/storage");
//! let hasher = PlainHasher;
//! let cx = ApplyContext::new(&storage, &hasher, &settings);
//!
//! let mut context = build_context(&Authors, Box::new(TestRecord::new("Author")), &settings).unwrap();
//! let outcome = upsert(&Authors, &mut context, SubmittedInput::new().with("name", "Ada"), &cx).unwrap();
//!
//! assert_eq!(outcome, UpsertOutcome::Saved { redirect: "/authors/browse".to_string() });
//! assert_eq!(context.model().get_attribute("name"), Some("Ada".into()));
//! ```

pub mod browse;
pub mod error;
pub mod manageable;
pub mod registry;
pub mod upsert;

pub use error::{AdminError, AdminResult};
pub use manageable::ManageableModel;
pub use registry::Registry;
pub use upsert::{UpsertOutcome, build_context, page_type, upsert};
