//! The manageable field capability
//!
//! Every field type owns a [`FieldCore`] holding the state shared by all
//! fields (name, value, attributes, options, rules, visibility) and
//! implements [`ManageableField`] to customise the construction, validation,
//! apply and render hooks. Builder-style configuration comes from the
//! blanket [`Configure`] extension.

use crate::attributes::HtmlAttributes;
use crate::context::{ApplyContext, BuildContext, RenderContext};
use crate::error::FieldResult;
use crate::inline::InlineValidation;
use crate::input::SubmittedInput;
use crate::name_codec;
use crate::options::{FieldOptions, LabelSource};
use crate::path::FieldPath;
use crate::resolver;
use crate::validation::ValidationRules;
use crate::visibility::{PageSet, PageType};
use regulate_core::{AdminSettings, Result};
use serde_json::{Value, json};

const GROUP_OPEN: &str = r#"<div class="regulate-field-group">"#;
const GROUP_CLOSE: &str = "</div>";

/// What a field writes back to the model on submit
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
	/// Write this value to the field's path
	Set(Value),
	/// Leave the model untouched
	Skip,
}

/// State shared by every field type
#[derive(Debug)]
pub struct FieldCore {
	name: String,
	encoded_name: String,
	path: FieldPath,
	value: Value,
	pub attributes: HtmlAttributes,
	pub options: FieldOptions,
	pub rules: ValidationRules,
	pub inline: InlineValidation,
	pub pages: PageSet,
	creating: bool,
	primary_key: Option<Value>,
	next_primary_key: Option<i64>,
}

impl FieldCore {
	/// Parse `name` and resolve its current value from the model
	pub fn new(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let path = FieldPath::parse(name)?;
		let value = resolver::resolve(cx.model, &path)?;
		Ok(Self::with_value(cx, name, path, value))
	}

	/// Parse `name` without reading the model. Used by fields that hold no value.
	pub fn unbound(cx: &BuildContext<'_>, name: &str) -> Result<Self> {
		let path = FieldPath::parse(name)?;
		Ok(Self::with_value(cx, name, path, Value::Null))
	}

	fn with_value(cx: &BuildContext<'_>, name: &str, path: FieldPath, value: Value) -> Self {
		let encoded_name = name_codec::encode(name);
		tracing::trace!(field = %name, kind = %path, "constructing field");
		Self {
			attributes: HtmlAttributes::new(&encoded_name, &value),
			name: name.to_string(),
			encoded_name,
			path,
			value,
			options: FieldOptions::default(),
			rules: ValidationRules::default(),
			inline: InlineValidation::default(),
			pages: PageSet::default(),
			creating: cx.model.is_being_created(),
			primary_key: cx.model.primary_key(),
			next_primary_key: cx.model.next_primary_key(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn encoded_name(&self) -> &str {
		&self.encoded_name
	}

	pub fn path(&self) -> &FieldPath {
		&self.path
	}

	pub fn value(&self) -> &Value {
		&self.value
	}

	/// Replace the current value, keeping the `value` attribute in sync
	pub fn set_value(&mut self, value: Value) {
		self.attributes
			.set("value", resolver::value_to_string(&value));
		self.value = value;
	}

	/// Whether the owning record was being created when the field was built
	pub fn is_creating(&self) -> bool {
		self.creating
	}

	pub fn primary_key(&self) -> Option<&Value> {
		self.primary_key.as_ref()
	}

	pub fn next_primary_key(&self) -> Option<i64> {
		self.next_primary_key
	}

	/// Key under which a companion input is submitted (`<encoded>_<suffix>`)
	pub fn companion_key(&self, suffix: &str) -> String {
		format!("{}{}", self.encoded_name, suffix)
	}
}

/// A renderable, validatable unit bound to one model attribute or path
pub trait ManageableField: Send + Sync {
	fn core(&self) -> &FieldCore;

	fn core_mut(&mut self) -> &mut FieldCore;

	/// Short type name, also the widget template name
	fn kind(&self) -> &'static str;

	/// Default rule and attribute setup, run once by the constructor
	fn post_constructed(&mut self, _settings: &AdminSettings) {}

	/// Correct the raw submitted value before standard validation.
	///
	/// A returned value replaces the raw one in the working input set.
	fn pre_validation(&mut self, _raw: Option<&Value>, _input: &SubmittedInput) -> Option<Value> {
		None
	}

	/// Whether this field sits out validation and apply for this submission
	fn skip_validation(&self, _input: &SubmittedInput) -> bool {
		false
	}

	/// Turn the submitted value into what is written to the model
	fn apply_submitted_value(
		&mut self,
		_input: &SubmittedInput,
		raw: Option<&Value>,
		_cx: &ApplyContext<'_>,
	) -> FieldResult<Applied> {
		Ok(Applied::Set(raw.cloned().unwrap_or(Value::Null)))
	}

	/// Value shown in the widget
	fn display_value(&self) -> Value {
		self.core().value().clone()
	}

	/// Data handed to the widget template
	fn template_data(&self, cx: &RenderContext<'_>) -> Value {
		base_template_data(self, cx)
	}

	fn template_name(&self, cx: &RenderContext<'_>) -> String {
		format!("{}/fields/{}.html", cx.settings.templates.prefix, self.kind())
	}

	/// Render the widget alone
	fn render(&self, cx: &RenderContext<'_>) -> Result<String> {
		cx.renderer
			.render(&self.template_name(cx), &self.template_data(cx))
	}

	/// Render the widget in its container, or nothing when hidden on `cx.page`
	fn render_parent(&self, cx: &RenderContext<'_>) -> Result<String> {
		let core = self.core();
		if !core.pages.contains(cx.page) {
			return Ok(String::new());
		}

		let body = self.render(cx)?;
		let mut html = String::new();
		if core.options.begin_group {
			html.push_str(GROUP_OPEN);
		}
		let class = match &core.options.container_class {
			Some(extra) => format!("regulate-field {}", extra),
			None => "regulate-field".to_string(),
		};
		html.push_str(&format!(
			r#"<div class="{}" data-field="{}">{}</div>"#,
			regulate_core::html::escape(&class),
			core.encoded_name(),
			body
		));
		if core.options.end_group {
			html.push_str(GROUP_CLOSE);
		}
		Ok(html)
	}

	fn name(&self) -> &str {
		self.core().name()
	}

	fn encoded_name(&self) -> &str {
		self.core().encoded_name()
	}

	fn value(&self) -> &Value {
		self.core().value()
	}

	/// The label, or `None` when suppressed
	fn label(&self) -> Option<String> {
		match &self.core().options.label {
			LabelSource::Explicit(text) => Some(text.clone()),
			LabelSource::Derived => Some(self.core().path().label()),
			LabelSource::Suppressed => None,
		}
	}

	/// Label used in validation messages; falls back to the derived label
	fn message_label(&self) -> String {
		self.label()
			.unwrap_or_else(|| self.core().path().label())
	}

	fn validation_rules(&self) -> &ValidationRules {
		&self.core().rules
	}

	fn run_inline_validation(&self, value: &Value) -> std::result::Result<(), String> {
		self.core().inline.run(value)
	}

	fn is_visible_on(&self, page: PageType) -> bool {
		self.core().pages.contains(page)
	}
}

/// Template data shared by every field type
pub fn base_template_data<F: ManageableField + ?Sized>(field: &F, cx: &RenderContext<'_>) -> Value {
	let core = field.core();
	let value = cx
		.old_value(core)
		.cloned()
		.unwrap_or_else(|| field.display_value());
	let mut attributes = core.attributes.clone();
	attributes.set("value", resolver::value_to_string(&value));

	json!({
		"kind": field.kind(),
		"name": core.name(),
		"encoded_name": core.encoded_name(),
		"label": field.label(),
		"value": value,
		"attributes": attributes,
		"attributes_html": attributes.to_html(),
		"notes": core.options.notes,
		"required": core.rules.contains("required"),
		"rules": core.rules.as_str(),
		"options": core.options.extra,
		"page": cx.page,
		"siblings": cx.sibling_values,
	})
}

/// Builder-style configuration available on every field type
///
/// # Examples
///
/// ```
/// use regulate_core::AdminSettings;
/// use regulate_forms::{BuildContext, Configure, ManageableField, PageType, Text};
/// use regulate_test::TestRecord;
///
/// let record = TestRecord::new("Post");
/// let settings = AdminSettings::default();
/// let cx = BuildContext::new(&record, &settings);
///
/// let title = Text::new(&cx, "title")
///     .unwrap()
///     .required()
///     .validation("max:120")
///     .show_on(&[PageType::Browse])
///     .with_label("Headline");
///
/// assert_eq!(title.validation_rules().as_str(), "required|max:120");
/// assert_eq!(title.label().as_deref(), Some("Headline"));
/// assert!(title.is_visible_on(PageType::Browse));
/// ```
pub trait Configure: ManageableField + Sized {
	fn required(mut self) -> Self {
		self.core_mut().rules.push("required");
		self
	}

	/// Append rules
	fn validation(mut self, rules: &str) -> Self {
		self.core_mut().rules.push(rules);
		self
	}

	/// Replace all rules
	fn overwrite_validation(mut self, rules: &str) -> Self {
		self.core_mut().rules.overwrite(rules);
		self
	}

	/// Append an inline validation callback
	fn inline_validation<F>(mut self, rule: F) -> Self
	where
		F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
	{
		self.core_mut().inline.push(rule);
		self
	}

	fn hide_from(mut self, pages: &[PageType]) -> Self {
		self.core_mut().pages.hide_from(pages);
		self
	}

	fn show_on(mut self, pages: &[PageType]) -> Self {
		self.core_mut().pages.show_on(pages);
		self
	}

	fn show_only_on(mut self, pages: &[PageType]) -> Self {
		self.core_mut().pages.show_only_on(pages);
		self
	}

	fn with_label(mut self, label: impl Into<String>) -> Self {
		self.core_mut().options.label = LabelSource::Explicit(label.into());
		self
	}

	fn without_label(mut self) -> Self {
		self.core_mut().options.label = LabelSource::Suppressed;
		self
	}

	/// Override the value resolved from the model
	fn with_value(mut self, value: impl Into<Value>) -> Self {
		let value = value.into();
		let core = self.core_mut();
		core.options.value = Some(value.clone());
		core.set_value(value);
		self
	}

	/// Merge HTML attributes, overwriting matching keys
	fn with_attributes<K, V, I>(mut self, attributes: I) -> Self
	where
		K: Into<String>,
		V: Into<String>,
		I: IntoIterator<Item = (K, V)>,
	{
		self.core_mut().attributes.merge(attributes);
		self
	}

	fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.core_mut().attributes.set(key, value);
		self
	}

	fn with_notes(mut self, notes: impl Into<String>) -> Self {
		self.core_mut().options.notes = Some(notes.into());
		self
	}

	fn with_container_class(mut self, class: impl Into<String>) -> Self {
		self.core_mut().options.container_class = Some(class.into());
		self
	}

	/// Never prefill from previously submitted input
	fn ignore_old(mut self) -> Self {
		self.core_mut().options.ignore_old = true;
		self
	}

	fn begin_group(mut self) -> Self {
		self.core_mut().options.begin_group = true;
		self
	}

	fn end_group(mut self) -> Self {
		self.core_mut().options.end_group = true;
		self
	}

	fn boxed(self) -> Box<dyn ManageableField>
	where
		Self: 'static,
	{
		Box::new(self)
	}
}

impl<T: ManageableField + Sized> Configure for T {}
