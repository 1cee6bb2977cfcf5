//! Image upload with optional resize and re-encoding

use super::file::{ConfigureUpload, UploadOptions, apply_upload, upload_template_data};
use crate::context::{ApplyContext, BuildContext, RenderContext};
use crate::error::{FieldError, FieldResult};
use crate::field::{Applied, FieldCore, ManageableField};
use crate::input::{SubmittedInput, UploadedFile};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use regulate_core::{AdminSettings, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Cursor;

/// Extensions accepted by image fields
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Region of the uploaded image to keep, in source pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl CropRect {
	/// Integer rectangle clamped to an image of `width` x `height`.
	///
	/// `None` when nothing of the rectangle lies inside the image.
	pub fn clamp_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
		let px = |v: f64| v.max(0.0).round() as u32;
		let x = px(self.x).min(width);
		let y = px(self.y).min(height);
		let w = px(self.width).min(width - x);
		let h = px(self.height).min(height - y);
		(w > 0 && h > 0).then_some((x, y, w, h))
	}
}

/// Processing applied to an accepted image before it is stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ImageProcessing {
	pub(crate) resize: Option<(u32, u32)>,
	pub(crate) format: Option<ImageFormat>,
}

impl ImageProcessing {
	/// Check the upload and return the processed replacement, if any.
	///
	/// Returns `Ok(None)` when the upload is stored as received.
	pub(crate) fn process(
		&self,
		field: &str,
		label: &str,
		upload: &UploadedFile,
		crop: Option<CropRect>,
	) -> FieldResult<Option<UploadedFile>> {
		let extension = upload.extension().unwrap_or_default();
		if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
			return Err(FieldError::upload(
				field,
				format!(
					"The {} field must be a file of type: {}.",
					label,
					ALLOWED_EXTENSIONS.join(", ")
				),
			));
		}
		let invalid = || FieldError::upload(field, format!("The {} field must be an image.", label));
		image::guess_format(&upload.bytes).map_err(|_| invalid())?;

		if crop.is_none() && self.resize.is_none() && self.format.is_none() {
			return Ok(None);
		}

		let mut decoded = image::load_from_memory(&upload.bytes).map_err(|e| {
			tracing::warn!(field = %field, error = %e, "failed to decode uploaded image");
			invalid()
		})?;
		if let Some(crop) = crop {
			match crop.clamp_to(decoded.width(), decoded.height()) {
				Some((x, y, width, height)) => decoded = decoded.crop_imm(x, y, width, height),
				None => tracing::debug!(field = %field, ?crop, "crop outside image, ignored"),
			}
		}
		if let Some((width, height)) = self.resize {
			decoded = decoded.resize(width, height, FilterType::Lanczos3);
		}

		let target = self
			.format
			.or_else(|| ImageFormat::from_extension(&extension))
			.ok_or_else(invalid)?;
		if target == ImageFormat::Jpeg {
			decoded = DynamicImage::ImageRgb8(decoded.to_rgb8());
		}
		let mut bytes = Cursor::new(Vec::new());
		decoded.write_to(&mut bytes, target).map_err(|e| {
			tracing::warn!(field = %field, error = %e, "failed to encode image");
			FieldError::upload(field, format!("The {} field could not be processed.", label))
		})?;

		let original_name = match (self.format, target.extensions_str().first()) {
			(Some(_), Some(new_extension)) => {
				let stem = std::path::Path::new(&upload.original_name)
					.file_stem()
					.and_then(|stem| stem.to_str())
					.unwrap_or("image");
				format!("{}.{}", stem, new_extension)
			}
			_ => upload.original_name.clone(),
		};
		Ok(Some(UploadedFile::new(original_name, bytes.into_inner())))
	}
}

/// Image upload
///
/// Accepts jpg, jpeg, png, gif, webp and bmp uploads. Optionally fits the
/// image into a bounding box and re-encodes it to another format.
#[derive(Debug)]
pub struct Image {
	core: FieldCore,
	upload: UploadOptions,
	processing: ImageProcessing,
}

impl Image {
	/// Create an image field storing uploads under `path`
	pub fn new(cx: &BuildContext<'_>, name: &str, path: &str) -> Result<Self> {
		let upload = UploadOptions::new(name, path)?;
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
			upload,
			processing: ImageProcessing::default(),
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	/// Fit the image inside `width` x `height`, keeping its aspect ratio
	pub fn resize(mut self, width: u32, height: u32) -> Self {
		self.processing.resize = Some((width.max(1), height.max(1)));
		self
	}

	/// Re-encode every upload to `format`
	pub fn format(mut self, format: ImageFormat) -> Self {
		self.processing.format = Some(format);
		self
	}

	pub(crate) fn store(
		&self,
		input: &SubmittedInput,
		raw: Option<&Value>,
		cx: &ApplyContext<'_>,
		crop: Option<CropRect>,
	) -> FieldResult<Applied> {
		let label = self.message_label();
		apply_upload(&self.core, &self.upload, input, raw, cx, |upload| {
			self.processing
				.process(self.core.encoded_name(), &label, upload, crop)
		})
	}
}

impl ConfigureUpload for Image {
	fn upload_options(&self) -> &UploadOptions {
		&self.upload
	}

	fn upload_options_mut(&mut self) -> &mut UploadOptions {
		&mut self.upload
	}
}

impl ManageableField for Image {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"image"
	}

	fn post_constructed(&mut self, _settings: &AdminSettings) {
		let accept: Vec<String> = ALLOWED_EXTENSIONS
			.iter()
			.map(|extension| format!(".{}", extension))
			.collect();
		self.core.attributes.set("type", "file");
		self.core.attributes.set("accept", accept.join(","));
	}

	fn apply_submitted_value(
		&mut self,
		input: &SubmittedInput,
		raw: Option<&Value>,
		cx: &ApplyContext<'_>,
	) -> FieldResult<Applied> {
		self.store(input, raw, cx, None)
	}

	fn template_data(&self, cx: &RenderContext<'_>) -> Value {
		upload_template_data(self, &self.upload, cx)
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use image::{GenericImageView, Rgba, RgbaImage};
	use regulate_core::InMemoryStorage;
	use regulate_test::{PlainHasher, TestRecord};
	use rstest::rstest;
	use serde_json::json;

	/// Encoded `width` x `height` test image
	pub(crate) fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
		let image = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
		let mut bytes = Cursor::new(Vec::new());
		DynamicImage::ImageRgba8(image)
			.write_to(&mut bytes, format)
			.unwrap();
		bytes.into_inner()
	}

	fn apply(field: &mut Image, upload: UploadedFile, storage: &InMemoryStorage) -> FieldResult<Applied> {
		let settings = AdminSettings::default();
		let cx = ApplyContext::new(storage, &PlainHasher, &settings);
		let input = SubmittedInput::new().with_file("photo", upload);
		field.apply_submitted_value(&input, None, &cx)
	}

	fn image_field() -> Image {
		let record = TestRecord::existing("Album", 5);
		let settings = AdminSettings::default();
		Image::new(&BuildContext::new(&record, &settings), "photo", "photos")
			.unwrap()
			.filename("{id}")
	}

	#[rstest]
	#[case("notes.txt")]
	#[case("archive.tar.gz")]
	#[case("noextension")]
	fn test_rejects_disallowed_extension(#[case] name: &str) {
		// Arrange
		let mut field = image_field();
		let storage = InMemoryStorage::new("/");

		// Act
		let error = apply(&mut field, UploadedFile::new(name, b"data".to_vec()), &storage).unwrap_err();

		// Assert
		assert!(matches!(error, FieldError::Upload { .. }));
		assert!(error.to_string().starts_with("The Photo field must be a file of type: jpg"));
		assert!(storage.paths().is_empty());
	}

	#[rstest]
	fn test_rejects_bytes_that_are_not_an_image() {
		// Arrange
		let mut field = image_field();
		let storage = InMemoryStorage::new("/");

		// Act
		let error = apply(&mut field, UploadedFile::new("cat.png", b"not an image".to_vec()), &storage)
			.unwrap_err();

		// Assert
		assert_eq!(error.to_string(), "The Photo field must be an image.");
	}

	#[rstest]
	fn test_stores_unprocessed_image_as_received() {
		// Arrange
		let mut field = image_field();
		let storage = InMemoryStorage::new("/");
		let bytes = encoded_image(4, 4, ImageFormat::Png);

		// Act
		let applied = apply(&mut field, UploadedFile::new("Cat.PNG", bytes.clone()), &storage).unwrap();

		// Assert
		assert_eq!(applied, Applied::Set(json!("photos/5.png")));
		assert_eq!(storage.read("photos/5.png"), Some(bytes));
	}

	#[rstest]
	fn test_resize_preserves_aspect_ratio() {
		// Arrange
		let mut field = image_field().resize(50, 50);
		let storage = InMemoryStorage::new("/");
		let upload = UploadedFile::new("wide.png", encoded_image(200, 100, ImageFormat::Png));

		// Act
		apply(&mut field, upload, &storage).unwrap();

		// Assert
		let stored = image::load_from_memory(&storage.read("photos/5.png").unwrap()).unwrap();
		assert_eq!(stored.dimensions(), (50, 25));
	}

	#[rstest]
	fn test_format_reencodes_and_renames() {
		// Arrange
		let mut field = image_field().format(ImageFormat::Jpeg);
		let storage = InMemoryStorage::new("/");
		let upload = UploadedFile::new("logo.png", encoded_image(8, 8, ImageFormat::Png));

		// Act
		let applied = apply(&mut field, upload, &storage).unwrap();

		// Assert
		assert_eq!(applied, Applied::Set(json!("photos/5.jpg")));
		let bytes = storage.read("photos/5.jpg").unwrap();
		assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
	}

	#[rstest]
	#[case(CropRect { x: 10.0, y: 10.0, width: 20.0, height: 30.0 }, 100, 100, Some((10, 10, 20, 30)))]
	#[case(CropRect { x: 90.0, y: 0.0, width: 50.0, height: 50.0 }, 100, 100, Some((90, 0, 10, 50)))]
	#[case(CropRect { x: -5.0, y: -5.0, width: 10.4, height: 10.6 }, 100, 100, Some((0, 0, 10, 11)))]
	#[case(CropRect { x: 100.0, y: 0.0, width: 10.0, height: 10.0 }, 100, 100, None)]
	#[case(CropRect { x: 0.0, y: 0.0, width: 0.0, height: 10.0 }, 100, 100, None)]
	fn test_crop_rect_clamps_to_image(
		#[case] crop: CropRect,
		#[case] width: u32,
		#[case] height: u32,
		#[case] expected: Option<(u32, u32, u32, u32)>,
	) {
		assert_eq!(crop.clamp_to(width, height), expected);
	}
}
