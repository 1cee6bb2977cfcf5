//! Contexts passed through the field pipeline
//!
//! Fields never hold a reference to their model or to request state. The
//! model is read once at construction through a [`BuildContext`]; rendering
//! and submission-apply receive what they need through a [`RenderContext`]
//! or an [`ApplyContext`] scoped to the current request.

use crate::field::{FieldCore, ManageableField};
use crate::input::SubmittedInput;
use crate::visibility::PageType;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regulate_core::{AdminSettings, Model, PasswordHasher, Result, Storage, ViewRenderer};
use serde_json::Value;

/// Read-only view of the model and settings while fields are constructed
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
	pub model: &'a dyn Model,
	pub settings: &'a AdminSettings,
}

impl<'a> BuildContext<'a> {
	pub fn new(model: &'a dyn Model, settings: &'a AdminSettings) -> Self {
		Self { model, settings }
	}
}

/// Request-scoped state for one render pass
pub struct RenderContext<'a> {
	pub renderer: &'a dyn ViewRenderer,
	pub settings: &'a AdminSettings,
	pub page: PageType,
	pub storage: Option<&'a dyn Storage>,
	pub old_input: Option<&'a SubmittedInput>,
	/// Current values of every field in the rendered set, keyed by encoded name
	pub sibling_values: IndexMap<String, Value>,
}

impl<'a> RenderContext<'a> {
	pub fn new(renderer: &'a dyn ViewRenderer, settings: &'a AdminSettings, page: PageType) -> Self {
		Self {
			renderer,
			settings,
			page,
			storage: None,
			old_input: None,
			sibling_values: IndexMap::new(),
		}
	}

	pub fn with_storage(mut self, storage: &'a dyn Storage) -> Self {
		self.storage = Some(storage);
		self
	}

	/// Input from a failed submission, used to prefill widgets
	pub fn with_old_input(mut self, input: &'a SubmittedInput) -> Self {
		self.old_input = Some(input);
		self
	}

	/// Record the display values of a field set so each field can see its siblings
	pub fn with_siblings(mut self, fields: &[Box<dyn ManageableField>]) -> Self {
		self.sibling_values = fields
			.iter()
			.map(|field| (field.encoded_name().to_string(), field.display_value()))
			.collect();
		self
	}

	pub fn sibling(&self, name: &str) -> Option<&Value> {
		self.sibling_values
			.get(name)
			.or_else(|| self.sibling_values.get(&crate::name_codec::encode(name)))
	}

	/// Previously submitted value for a field, unless it opts out
	pub fn old_value(&self, core: &FieldCore) -> Option<&Value> {
		if core.options.ignore_old {
			return None;
		}
		self.old_input
			.and_then(|input| input.get(core.encoded_name()))
	}
}

/// Render a field set in order, each field seeing its siblings' values
pub fn render_fields(fields: &[Box<dyn ManageableField>], cx: RenderContext<'_>) -> Result<String> {
	let cx = cx.with_siblings(fields);
	let mut html = String::new();
	for field in fields {
		html.push_str(&field.render_parent(&cx)?);
	}
	Ok(html)
}

/// Collaborators available while submitted values are applied
pub struct ApplyContext<'a> {
	pub storage: &'a dyn Storage,
	pub hasher: &'a dyn PasswordHasher,
	pub settings: &'a AdminSettings,
	/// Time used for `{time}` filename placeholders
	pub now: DateTime<Utc>,
}

impl<'a> ApplyContext<'a> {
	pub fn new(
		storage: &'a dyn Storage,
		hasher: &'a dyn PasswordHasher,
		settings: &'a AdminSettings,
	) -> Self {
		Self {
			storage,
			hasher,
			settings,
			now: Utc::now(),
		}
	}

	pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
		self.now = now;
		self
	}
}

/// One model instance and the ordered fields forming its editable surface
pub struct ModelContext {
	model: Box<dyn Model>,
	fields: Vec<Box<dyn ManageableField>>,
}

impl ModelContext {
	pub fn new(model: Box<dyn Model>) -> Self {
		Self {
			model,
			fields: Vec::new(),
		}
	}

	/// Wrap `model` and build its fields from it
	///
	/// # Examples
	///
	/// ```
	/// use regulate_core::AdminSettings;
	/// use regulate_forms::{Configure, ModelContext, Text};
	/// use regulate_test::TestRecord;
	///
	/// let settings = AdminSettings::default();
	/// let record = TestRecord::existing("Post", 1).with_attribute("title", "Hello");
	///
	/// let context = ModelContext::build(Box::new(record), &settings, |cx| {
	///     Ok(vec![Text::new(cx, "title")?.required().boxed()])
	/// })
	/// .unwrap();
	///
	/// assert!(!context.is_being_created());
	/// assert_eq!(context.fields().len(), 1);
	/// assert_eq!(context.fields()[0].value(), "Hello");
	/// ```
	pub fn build<F>(model: Box<dyn Model>, settings: &AdminSettings, build: F) -> Result<Self>
	where
		F: FnOnce(&BuildContext<'_>) -> Result<Vec<Box<dyn ManageableField>>>,
	{
		let fields = build(&BuildContext::new(model.as_ref(), settings))?;
		tracing::debug!(
			model = model.model_name(),
			fields = fields.len(),
			"built model context"
		);
		Ok(Self { model, fields })
	}

	pub fn model(&self) -> &dyn Model {
		self.model.as_ref()
	}

	pub fn model_mut(&mut self) -> &mut dyn Model {
		self.model.as_mut()
	}

	pub fn is_being_created(&self) -> bool {
		self.model.is_being_created()
	}

	pub fn fields(&self) -> &[Box<dyn ManageableField>] {
		&self.fields
	}

	pub fn fields_mut(&mut self) -> &mut [Box<dyn ManageableField>] {
		&mut self.fields
	}

	pub fn push_field(&mut self, field: Box<dyn ManageableField>) {
		self.fields.push(field);
	}

	/// Borrow the model and the fields mutably at the same time
	pub fn parts_mut(&mut self) -> (&mut dyn Model, &mut [Box<dyn ManageableField>]) {
		(self.model.as_mut(), &mut self.fields)
	}

	pub fn into_model(self) -> Box<dyn Model> {
		self.model
	}
}
