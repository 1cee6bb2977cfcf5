//! Manageable fields for the Regulate admin panel
//!
//! A manageable field binds one model attribute, relation attribute or JSON
//! path to an editable widget. This crate provides:
//! - the name codec that keeps dotted names intact through form submission
//! - field paths and the value resolver (`column`, `relation.column`, `column->json->path`)
//! - the [`ManageableField`] capability with its option, validation and visibility state
//! - the concrete field types (text, select, json, monetary, password, file, image, ...)
//! - the rule-string validator and inline validation chains

pub mod attributes;
pub mod context;
pub mod error;
pub mod field;
pub mod fields;
pub mod input;
pub mod inline;
pub mod name_codec;
pub mod options;
pub mod path;
pub mod resolver;
pub mod templates;
pub mod validation;
pub mod visibility;

pub use attributes::HtmlAttributes;
pub use context::{ApplyContext, BuildContext, ModelContext, RenderContext};
pub use error::{FieldError, FieldResult};
pub use field::{Applied, Configure, FieldCore, ManageableField};
pub use fields::{
	ConfigureUpload, File, Hidden, Image, ImageCroppable, Json, JsonUi, MonetaryValue, Password,
	SearchableValue, Select, Tags, TemplateElement, Text, TextArea, Wysiwyg,
};
pub use input::{SubmittedInput, UploadedFile};
pub use inline::InlineValidation;
pub use options::{FieldOptions, LabelSource};
pub use path::FieldPath;
pub use validation::ValidationRules;
pub use visibility::{PageSet, PageType};
