//! # Regulate
//!
//! Manageable fields for admin panels: a field binds one model attribute,
//! relation attribute or JSON path to an editable widget, validates what the
//! user submits and writes it back.
//!
//! ## Feature Flags
//!
//! - `forms` - name codec, resolver, field types and validation
//! - `admin` - browse columns, filters, pagination and the upsert orchestrator
//! - `test` - fixtures for testing code built on Regulate
//! - `full` (default) - `forms` and `admin`
//!
//! ## Quick Example
//!
//! ```
//! use regulate::prelude::*;
//! use regulate_test::TestRecord;
//!
//! let settings = AdminSettings::default();
//! let record = TestRecord::existing("Post", 1)
//!     .with_attribute("meta", r#"{"seo":{"title":"Hello"}}"#);
//!
//! let context = ModelContext::build(Box::new(record), &settings, |cx| {
//!     Ok(vec![Text::new(cx, "meta->seo->title")?.required().boxed()])
//! })
//! .unwrap();
//!
//! assert_eq!(context.fields()[0].value(), "Hello");
//! ```

pub mod core;
#[cfg(feature = "forms")]
pub mod forms;
#[cfg(feature = "admin")]
pub mod admin;
#[cfg(feature = "test")]
pub use regulate_test as test;

/// Commonly used types
pub mod prelude {
	pub use regulate_core::{
		AdminSettings, Error, InMemoryStorage, LocalStorage, Model, PasswordHasher, Result,
		Storage, TeraRenderer, ViewRenderer,
	};

	#[cfg(feature = "forms")]
	pub use regulate_forms::{
		ApplyContext, Applied, BuildContext, Configure, ConfigureUpload, FieldError, FieldPath,
		FieldResult, File, Hidden, Image, ImageCroppable, Json, JsonUi, ManageableField,
		ModelContext, MonetaryValue, PageType, Password, RenderContext, SearchableValue, Select,
		SubmittedInput, Tags, TemplateElement, Text, TextArea, UploadedFile, Wysiwyg,
	};

	#[cfg(feature = "admin")]
	pub use regulate_admin::browse::{
		BrowseColumn, BrowseFilter, BrowsePlan, BrowseRequest, Direction, FilterOperator,
		Paginator, QueryBuilder,
	};
	#[cfg(feature = "admin")]
	pub use regulate_admin::{AdminError, AdminResult, ManageableModel, Registry, UpsertOutcome, upsert};
}
