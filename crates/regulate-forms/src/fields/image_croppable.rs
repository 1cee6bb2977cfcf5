//! Image upload with a client-side crop selection

use super::file::{ConfigureUpload, UploadOptions, upload_template_data};
use super::image::{CropRect, Image};
use crate::context::{ApplyContext, BuildContext, RenderContext};
use crate::error::{FieldError, FieldResult};
use crate::field::{Applied, FieldCore, ManageableField};
use crate::input::SubmittedInput;
use image::ImageFormat;
use regulate_core::{AdminSettings, Result};
use serde_json::Value;

/// [`Image`] whose upload is cropped to the rectangle submitted under
/// `<encoded name>_crop` before it is stored
#[derive(Debug)]
pub struct ImageCroppable {
	image: Image,
	crop_key: String,
}

impl ImageCroppable {
	pub fn new(cx: &BuildContext<'_>, name: &str, path: &str) -> Result<Self> {
		let mut field = Self {
			image: Image::new(cx, name, path)?,
			crop_key: String::new(),
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Width / height ratio enforced by the crop widget
	pub fn aspect_ratio(mut self, ratio: f64) -> Self {
		self.image.core_mut().options.set_extra("aspect_ratio", ratio);
		self
	}

	pub fn resize(mut self, width: u32, height: u32) -> Self {
		self.image = self.image.resize(width, height);
		self
	}

	pub fn format(mut self, format: ImageFormat) -> Self {
		self.image = self.image.format(format);
		self
	}

	/// Input name carrying the crop rectangle
	pub fn crop_key(&self) -> &str {
		&self.crop_key
	}

	/// Crop rectangle of this submission, if one was sent
	pub fn submitted_crop(&self, input: &SubmittedInput) -> FieldResult<Option<CropRect>> {
		let invalid = |detail: String| {
			FieldError::upload(
				self.encoded_name(),
				format!("The {} crop selection is invalid ({}).", self.message_label(), detail),
			)
		};
		let crop = match input.get(&self.crop_key) {
			None | Some(Value::Null) => return Ok(None),
			Some(Value::String(text)) if text.trim().is_empty() => return Ok(None),
			Some(Value::String(text)) => serde_json::from_str(text),
			Some(other) => serde_json::from_value(other.clone()),
		};
		crop.map(Some).map_err(|e| invalid(e.to_string()))
	}
}

impl ConfigureUpload for ImageCroppable {
	fn upload_options(&self) -> &UploadOptions {
		self.image.upload_options()
	}

	fn upload_options_mut(&mut self) -> &mut UploadOptions {
		self.image.upload_options_mut()
	}
}

impl ManageableField for ImageCroppable {
	fn core(&self) -> &FieldCore {
		self.image.core()
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		self.image.core_mut()
	}

	fn kind(&self) -> &'static str {
		"image_croppable"
	}

	fn post_constructed(&mut self, _settings: &AdminSettings) {
		self.crop_key = self.core().companion_key("_crop");
	}

	fn apply_submitted_value(
		&mut self,
		input: &SubmittedInput,
		raw: Option<&Value>,
		cx: &ApplyContext<'_>,
	) -> FieldResult<Applied> {
		let crop = self.submitted_crop(input)?;
		self.image.store(input, raw, cx, crop)
	}

	fn template_data(&self, cx: &RenderContext<'_>) -> Value {
		let mut data = upload_template_data(self, self.upload_options(), cx);
		data["crop_key"] = Value::String(self.crop_key.clone());
		data
	}
}
