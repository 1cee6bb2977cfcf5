// Plain value fields
pub mod hidden;
pub mod select;
pub mod text;
pub mod text_area;
pub mod wysiwyg;

// Structured value fields
pub mod json;
pub mod json_ui;
pub mod monetary_value;
pub mod password;
pub mod searchable_value;
pub mod tags;

// Upload fields
pub mod file;
pub mod image;
pub mod image_croppable;

// Template-only
pub mod template_element;

// Re-exports for plain value fields
pub use hidden::Hidden;
pub use select::Select;
pub use text::Text;
pub use text_area::TextArea;
pub use wysiwyg::Wysiwyg;

// Re-exports for structured value fields
pub use json::Json;
pub use json_ui::JsonUi;
pub use monetary_value::MonetaryValue;
pub use password::Password;
pub use searchable_value::{SearchMode, SearchableValue};
pub use tags::Tags;

// Re-exports for upload fields
pub use file::{ConfigureUpload, File, UploadOptions};
pub use self::image::{CropRect, Image};
pub use image_croppable::ImageCroppable;

pub use template_element::TemplateElement;
