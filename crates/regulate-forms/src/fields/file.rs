//! File upload, plus the upload flow shared with the image fields

use crate::context::{ApplyContext, BuildContext, RenderContext};
use crate::error::FieldResult;
use crate::field::{Applied, FieldCore, ManageableField, base_template_data};
use crate::input::{SubmittedInput, UploadedFile};
use crate::resolver::value_to_string;
use chrono::{DateTime, Utc};
use regulate_core::{Error, Result};
use serde_json::Value;

const DEFAULT_FILENAME: &str = "{time}_{name}";

/// Where and how an upload field stores its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
	/// Directory on the storage disk, without leading or trailing `/`
	pub path: String,
	/// Filename template; `{id}`, `{time}` and `{name}` are replaced and the
	/// upload's extension is appended
	pub filename: String,
	/// Store only the filename instead of `path/filename`
	pub store_filename_only: bool,
	/// Delete the previously stored file when a new one is uploaded
	pub unlink_old: bool,
}

impl UploadOptions {
	/// Validate `path` for the field `name`; an empty path is a configuration error
	pub fn new(name: &str, path: &str) -> Result<Self> {
		let path = path.trim().trim_matches('/');
		if path.is_empty() {
			return Err(Error::configuration(format!(
				"Upload field '{}' requires a non-empty 'path' option",
				name
			)));
		}
		Ok(Self {
			path: path.to_string(),
			filename: DEFAULT_FILENAME.to_string(),
			store_filename_only: false,
			unlink_old: false,
		})
	}

	/// Storage path of a stored attribute value
	pub fn stored_path(&self, stored: &str) -> String {
		if !self.store_filename_only && stored.contains('/') {
			stored.to_string()
		} else {
			format!("{}/{}", self.path, stored)
		}
	}

	/// Expand the filename template for an upload
	///
	/// # Examples
	///
	/// ```
	/// use chrono::{TimeZone, Utc};
	/// use regulate_forms::UploadedFile;
	/// use regulate_forms::fields::file::UploadOptions;
	/// use serde_json::json;
	///
	/// let mut options = UploadOptions::new("avatar", "avatars").unwrap();
	/// options.filename = "user-{id}-{time}".to_string();
	/// let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
	///
	/// let upload = UploadedFile::new("Me.PNG", vec![]);
	/// assert_eq!(
	///     options.expand_filename(&upload, Some(&json!(42)), None, now),
	///     "user-42-1700000000.png"
	/// );
	/// ```
	pub fn expand_filename(
		&self,
		upload: &UploadedFile,
		primary_key: Option<&Value>,
		next_primary_key: Option<i64>,
		now: DateTime<Utc>,
	) -> String {
		let id = primary_key
			.map(value_to_string)
			.filter(|id| !id.is_empty())
			.or_else(|| next_primary_key.map(|id| id.to_string()))
			.unwrap_or_else(|| "new".to_string());
		let stem = std::path::Path::new(&upload.original_name)
			.file_stem()
			.and_then(|stem| stem.to_str())
			.map(sanitize)
			.unwrap_or_default();

		let mut filename = self
			.filename
			.replace("{id}", &id)
			.replace("{time}", &now.timestamp().to_string())
			.replace("{name}", &stem);
		if let Some(extension) = upload.extension() {
			filename.push('.');
			filename.push_str(&extension);
		}
		filename
	}
}

fn sanitize(stem: &str) -> String {
	stem.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
		.collect()
}

/// Delete the file behind the field's stored value.
///
/// Values whose basename has no `.` are treated as directories and left alone.
pub(crate) fn remove_stored(
	core: &FieldCore,
	options: &UploadOptions,
	cx: &ApplyContext<'_>,
) -> FieldResult<()> {
	let stored = value_to_string(core.value());
	if stored.is_empty() {
		return Ok(());
	}
	let basename = stored.rsplit('/').next().unwrap_or(&stored);
	if !basename.contains('.') {
		tracing::debug!(field = %core.name(), stored = %stored, "stored value is not a file, nothing to delete");
		return Ok(());
	}
	let path = options.stored_path(&stored);
	cx.storage.delete(&path)?;
	tracing::info!(field = %core.name(), path = %path, "deleted stored file");
	Ok(())
}

/// The submit flow shared by every upload field.
///
/// 1. The remove sentinel deletes the stored file and nulls the value.
/// 2. Without an upload the model is left untouched.
/// 3. Otherwise the old file is optionally deleted and `transform` may
///    replace the upload (resized, cropped, re-encoded) before it is stored
///    under the expanded filename.
pub(crate) fn apply_upload<T>(
	core: &FieldCore,
	options: &UploadOptions,
	input: &SubmittedInput,
	raw: Option<&Value>,
	cx: &ApplyContext<'_>,
	transform: T,
) -> FieldResult<Applied>
where
	T: FnOnce(&UploadedFile) -> FieldResult<Option<UploadedFile>>,
{
	if let Some(Value::String(raw)) = raw
		&& *raw == cx.settings.uploads.remove_value
	{
		remove_stored(core, options, cx)?;
		return Ok(Applied::Set(Value::Null));
	}

	let Some(upload) = input.file(core.encoded_name()) else {
		return Ok(Applied::Skip);
	};

	if options.unlink_old {
		remove_stored(core, options, cx)?;
	}

	let transformed = transform(upload)?;
	let upload = transformed.as_ref().unwrap_or(upload);
	let filename = options.expand_filename(
		upload,
		core.primary_key(),
		core.next_primary_key(),
		cx.now,
	);
	let path = format!("{}/{}", options.path, filename);
	cx.storage.put(&path, &upload.bytes)?;
	tracing::info!(field = %core.name(), path = %path, size = upload.size(), "stored upload");

	let stored = if options.store_filename_only {
		filename
	} else {
		path
	};
	Ok(Applied::Set(Value::String(stored)))
}

/// Preview data shared by upload widgets
pub(crate) fn upload_template_data<F: ManageableField + ?Sized>(
	field: &F,
	options: &UploadOptions,
	cx: &RenderContext<'_>,
) -> Value {
	let mut data = base_template_data(field, cx);
	let stored = value_to_string(field.core().value());
	let url = match cx.storage {
		Some(storage) if !stored.is_empty() => Some(storage.url(&options.stored_path(&stored))),
		_ => None,
	};
	data["url"] = url.map(Value::String).unwrap_or(Value::Null);
	data["remove_value"] = Value::String(cx.settings.uploads.remove_value.clone());
	data
}

/// Storage builders shared by [`File`], [`Image`](super::Image) and
/// [`ImageCroppable`](super::ImageCroppable)
pub trait ConfigureUpload: ManageableField + Sized {
	fn upload_options(&self) -> &UploadOptions;

	fn upload_options_mut(&mut self) -> &mut UploadOptions;

	/// Filename template (`{id}`, `{time}`, `{name}`); the extension is appended
	fn filename(mut self, template: &str) -> Self {
		self.upload_options_mut().filename = template.to_string();
		self
	}

	fn store_filename_only(mut self) -> Self {
		self.upload_options_mut().store_filename_only = true;
		self
	}

	fn unlink_old(mut self) -> Self {
		self.upload_options_mut().unlink_old = true;
		self
	}
}

/// Generic file upload
#[derive(Debug)]
pub struct File {
	core: FieldCore,
	upload: UploadOptions,
}

impl File {
	/// Create a file field storing uploads under `path`
	pub fn new(cx: &BuildContext<'_>, name: &str, path: &str) -> Result<Self> {
		let upload = UploadOptions::new(name, path)?;
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
			upload,
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

}

impl ConfigureUpload for File {
	fn upload_options(&self) -> &UploadOptions {
		&self.upload
	}

	fn upload_options_mut(&mut self) -> &mut UploadOptions {
		&mut self.upload
	}
}

impl ManageableField for File {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"file"
	}

	fn post_constructed(&mut self, _settings: &regulate_core::AdminSettings) {
		self.core.attributes.set("type", "file");
	}

	fn apply_submitted_value(
		&mut self,
		input: &SubmittedInput,
		raw: Option<&Value>,
		cx: &ApplyContext<'_>,
	) -> FieldResult<Applied> {
		apply_upload(&self.core, &self.upload, input, raw, cx, |_| Ok(None))
	}

	fn template_data(&self, cx: &RenderContext<'_>) -> Value {
		upload_template_data(self, &self.upload, cx)
	}
}
