//! Create-or-update orchestration for one model context
//!
//! A submission moves through fixed steps: pre-validation corrections are
//! merged into the working input, standard rules run, inline validation runs
//! only when standard rules passed, every field computes what it writes back,
//! the values are assigned through their paths and the model is saved.
//! Nothing is written to the model unless every step before it succeeded.

use crate::error::AdminResult;
use crate::manageable::ManageableModel;
use indexmap::IndexMap;
use regulate_core::{AdminSettings, Model};
use regulate_forms::validation::validate;
use regulate_forms::{
	ApplyContext, Applied, FieldError, FieldPath, ManageableField, ModelContext, PageType,
	SubmittedInput, resolver,
};
use serde::Serialize;
use serde_json::Value;

/// Result of an upsert submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpsertOutcome {
	/// The model was saved; continue at `redirect`
	Saved { redirect: String },
	/// Nothing was saved. `errors` is keyed by encoded field name and
	/// `old_input` is the working input after pre-validation corrections.
	Invalid {
		errors: IndexMap<String, Vec<String>>,
		old_input: SubmittedInput,
	},
}

impl UpsertOutcome {
	pub fn is_saved(&self) -> bool {
		matches!(self, Self::Saved { .. })
	}

	/// Messages for one field, empty when it passed
	pub fn errors_for(&self, name: &str) -> &[String] {
		match self {
			Self::Invalid { errors, .. } => errors
				.get(name)
				.or_else(|| errors.get(&regulate_forms::name_codec::encode(name)))
				.map(Vec::as_slice)
				.unwrap_or_default(),
			Self::Saved { .. } => &[],
		}
	}
}

/// Wrap `model` in a context holding the admin's field set
pub fn build_context(
	admin: &dyn ManageableModel,
	model: Box<dyn Model>,
	settings: &AdminSettings,
) -> AdminResult<ModelContext> {
	Ok(ModelContext::build(model, settings, |cx| admin.fields(cx))?)
}

/// The page a context is submitted from
pub fn page_type(context: &ModelContext) -> PageType {
	if context.is_being_created() {
		PageType::Create
	} else {
		PageType::Edit
	}
}

/// Validate `input` against the context's fields and, if valid, apply and save.
///
/// Only fields visible on the current page take part. Fields that opt out
/// through [`ManageableField::skip_validation`] sit out both validation and
/// apply.
///
/// # Errors
///
/// User input problems never produce an `Err`; they come back as
/// [`UpsertOutcome::Invalid`]. Configuration, storage and persistence
/// failures are returned as errors.
pub fn upsert(
	admin: &dyn ManageableModel,
	context: &mut ModelContext,
	input: SubmittedInput,
	cx: &ApplyContext<'_>,
) -> AdminResult<UpsertOutcome> {
	let page = page_type(context);
	let (model, fields) = context.parts_mut();
	tracing::info!(
		model = %admin.url_alias(),
		page = %page,
		fields = fields.len(),
		"upsert started"
	);

	let mut input = input;
	for field in fields.iter_mut().filter(|field| field.is_visible_on(page)) {
		let raw = input.get(field.encoded_name()).cloned();
		if let Some(corrected) = field.pre_validation(raw.as_ref(), &input) {
			input.force_merge(field.encoded_name(), corrected);
		}
	}

	let participating: Vec<usize> = fields
		.iter()
		.enumerate()
		.filter(|(_, field)| field.is_visible_on(page) && !field.skip_validation(&input))
		.map(|(index, _)| index)
		.collect();

	let mut errors = standard_errors(fields, &participating, &input)?;
	if errors.is_empty() {
		errors = inline_errors(fields, &participating, &input);
	}
	if !errors.is_empty() {
		return Ok(invalid(admin, errors, input));
	}

	let mut writes: Vec<(FieldPath, Value)> = Vec::new();
	for &index in &participating {
		let field = &mut fields[index];
		let raw = input.get(field.encoded_name()).cloned();
		match field.apply_submitted_value(&input, raw.as_ref(), cx) {
			Ok(Applied::Set(value)) => writes.push((field.core().path().clone(), value)),
			Ok(Applied::Skip) => {
				tracing::debug!(field = %field.name(), "field left model untouched");
			}
			Err(FieldError::Core(error)) => return Err(error.into()),
			Err(error) => {
				let key = error
					.field()
					.unwrap_or(field.encoded_name())
					.to_string();
				errors.entry(key).or_default().push(error.to_string());
			}
		}
	}
	if !errors.is_empty() {
		return Ok(invalid(admin, errors, input));
	}

	for (path, value) in writes {
		resolver::assign(model, &path, value)?;
	}
	model.save()?;
	tracing::info!(model = %admin.url_alias(), page = %page, "upsert saved");

	Ok(UpsertOutcome::Saved {
		redirect: admin.browse_url(),
	})
}

fn standard_errors(
	fields: &[Box<dyn ManageableField>],
	participating: &[usize],
	input: &SubmittedInput,
) -> AdminResult<IndexMap<String, Vec<String>>> {
	let mut errors = IndexMap::new();
	for &index in participating {
		let field = &fields[index];
		let rules = field.validation_rules().rules()?;
		let messages = validate(&rules, field.encoded_name(), &field.message_label(), input);
		if !messages.is_empty() {
			errors.insert(field.encoded_name().to_string(), messages);
		}
	}
	Ok(errors)
}

fn inline_errors(
	fields: &[Box<dyn ManageableField>],
	participating: &[usize],
	input: &SubmittedInput,
) -> IndexMap<String, Vec<String>> {
	let mut errors = IndexMap::new();
	for &index in participating {
		let field = &fields[index];
		let value = input
			.get(field.encoded_name())
			.cloned()
			.unwrap_or(Value::Null);
		if let Err(message) = field.run_inline_validation(&value) {
			tracing::debug!(field = %field.name(), "inline validation failed");
			errors.insert(field.encoded_name().to_string(), vec![message]);
		}
	}
	errors
}

fn invalid(
	admin: &dyn ManageableModel,
	errors: IndexMap<String, Vec<String>>,
	old_input: SubmittedInput,
) -> UpsertOutcome {
	tracing::info!(
		model = %admin.url_alias(),
		fields = errors.len(),
		"upsert rejected submitted input"
	);
	UpsertOutcome::Invalid { errors, old_input }
}
