//! Built-in widget templates
//!
//! Every field kind renders `<prefix>/fields/<kind>.html`. The markup here
//! is a plain baseline; applications override any of it by registering a
//! template under the same name.

use regulate_core::{AdminSettings, Result, TeraRenderer};

macro_rules! label {
	() => {
		r#"{% if label %}<label for="{{ encoded_name }}">{{ label }}{% if required %} <span class="regulate-required">*</span>{% endif %}</label>{% endif %}"#
	};
}

macro_rules! notes {
	() => {
		r#"{% if notes %}<small class="regulate-notes">{{ notes }}</small>{% endif %}"#
	};
}

macro_rules! upload_preview {
	($preview:expr) => {
		concat!(
			r#"{% if url %}<div class="regulate-upload-current">"#,
			$preview,
			r#"<label><input type="checkbox" name="{{ encoded_name }}" value="{{ remove_value }}"> Remove</label></div>{% endif %}"#
		)
	};
}

const INPUT: &str = concat!(label!(), r#"<input {{ attributes_html | safe }}>"#, notes!());

const HIDDEN: &str = r#"<input {{ attributes_html | safe }}>"#;

const TEXT_AREA: &str = concat!(
	label!(),
	r#"<textarea name="{{ encoded_name }}" id="{{ encoded_name }}" rows="{{ options.rows | default(value=5) }}">{{ value }}</textarea>"#,
	notes!()
);

const WYSIWYG: &str = concat!(
	label!(),
	r#"<textarea class="regulate-wysiwyg" name="{{ encoded_name }}" id="{{ encoded_name }}"{% if options.toolbar %} data-toolbar="{{ options.toolbar }}"{% endif %}>{{ value }}</textarea>"#,
	notes!()
);

const SELECT: &str = concat!(
	label!(),
	r#"<select name="{{ encoded_name }}" id="{{ encoded_name }}">{% for item in items %}<option value="{{ item.key }}"{% if item.selected %} selected{% endif %}>{{ item.label }}</option>{% endfor %}</select>"#,
	notes!()
);

const TAGS: &str = concat!(
	label!(),
	r#"<input type="text" class="regulate-tags" name="{{ encoded_name }}" id="{{ encoded_name }}" value="{{ tags | join(sep=", ") }}">"#,
	notes!()
);

const JSON: &str = concat!(
	label!(),
	r#"<textarea class="regulate-json" name="{{ encoded_name }}" id="{{ encoded_name }}">{{ value }}</textarea>"#,
	notes!()
);

const JSON_UI: &str = concat!(
	label!(),
	r#"<table class="regulate-json-ui" data-field="{{ encoded_name }}">{% for pair in pairs %}<tr><td><input type="text" name="{{ encoded_name }}[{{ loop.index0 }}][key]" value="{{ pair.key }}"></td><td><input type="text" name="{{ encoded_name }}[{{ loop.index0 }}][value]" value="{{ pair.value }}"></td></tr>{% endfor %}</table>"#,
	notes!()
);

const PASSWORD: &str = concat!(
	label!(),
	r#"{% if not creating %}<label><input type="checkbox" name="{{ change_key }}" value="1"> Change</label>{% endif %}"#,
	r#"<input {{ attributes_html | safe }}>"#,
	notes!()
);

const SEARCHABLE_VALUE: &str = concat!(
	label!(),
	r#"<input type="hidden" name="{{ encoded_name }}" value="{{ value }}">"#,
	r#"<input type="search" class="regulate-search" data-mode="{{ options.mode | default(value=0) }}" value="{{ search }}">"#,
	r#"{% if results %}<ul class="regulate-search-results">{% for result in results %}<li data-key="{{ result.key }}">{{ result.label }}</li>{% endfor %}</ul>{% endif %}"#,
	notes!()
);

const FILE: &str = concat!(
	label!(),
	upload_preview!(r#"<a href="{{ url }}">{{ value }}</a>"#),
	r#"<input {{ attributes_html | safe }}>"#,
	notes!()
);

const IMAGE: &str = concat!(
	label!(),
	upload_preview!(r#"<img src="{{ url }}" alt="{{ label }}">"#),
	r#"<input {{ attributes_html | safe }}>"#,
	notes!()
);

const IMAGE_CROPPABLE: &str = concat!(
	label!(),
	upload_preview!(r#"<img src="{{ url }}" alt="{{ label }}">"#),
	r#"<input {{ attributes_html | safe }}{% if options.aspect_ratio %} data-aspect-ratio="{{ options.aspect_ratio }}"{% endif %}>"#,
	r#"<input type="hidden" name="{{ crop_key }}" value="">"#,
	notes!()
);

/// Built-in templates keyed by field kind
pub const BUILTIN: &[(&str, &str)] = &[
	("text", INPUT),
	("text_area", TEXT_AREA),
	("hidden", HIDDEN),
	("wysiwyg", WYSIWYG),
	("select", SELECT),
	("tags", TAGS),
	("json", JSON),
	("json_ui", JSON_UI),
	("monetary_value", INPUT),
	("password", PASSWORD),
	("searchable_value", SEARCHABLE_VALUE),
	("file", FILE),
	("image", IMAGE),
	("image_croppable", IMAGE_CROPPABLE),
];

/// Register the built-in templates under the configured prefix
pub fn register(renderer: &mut TeraRenderer, settings: &AdminSettings) -> Result<()> {
	let named: Vec<(String, &str)> = BUILTIN
		.iter()
		.map(|(kind, content)| {
			(
				format!("{}/fields/{}.html", settings.templates.prefix, kind),
				*content,
			)
		})
		.collect();
	let templates: Vec<(&str, &str)> = named
		.iter()
		.map(|(name, content)| (name.as_str(), *content))
		.collect();
	renderer.add_raw_templates(&templates)?;
	tracing::debug!(count = templates.len(), prefix = %settings.templates.prefix, "registered built-in field templates");
	Ok(())
}

/// A Tera renderer holding only the built-in templates
///
/// # Examples
///
/// ```
/// use regulate_core::AdminSettings;
/// use regulate_forms::templates::default_renderer;
///
/// let renderer = default_renderer(&AdminSettings::default()).unwrap();
/// assert!(renderer.has_template("regulate/fields/text.html"));
/// assert!(renderer.has_template("regulate/fields/image_croppable.html"));
/// ```
pub fn default_renderer(settings: &AdminSettings) -> Result<TeraRenderer> {
	let mut renderer = TeraRenderer::empty();
	register(&mut renderer, settings)?;
	Ok(renderer)
}

#[cfg(test)]
mod tests {
	use super::*;
	use regulate_core::ViewRenderer;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_input_escapes_label_but_not_attributes() {
		// Arrange
		let renderer = default_renderer(&AdminSettings::default()).unwrap();
		let data = json!({
			"encoded_name": "title",
			"label": "<Title>",
			"required": true,
			"notes": null,
			"attributes_html": r#"name="title" value="a &amp; b""#,
		});

		// Act
		let html = renderer.render("regulate/fields/text.html", &data).unwrap();

		// Assert
		assert_eq!(
			html,
			r#"<label for="title">&lt;Title&gt; <span class="regulate-required">*</span></label><input name="title" value="a &amp; b">"#
		);
	}

	#[rstest]
	fn test_custom_prefix() {
		// Arrange
		let mut settings = AdminSettings::default();
		settings.templates.prefix = "backoffice".to_string();

		// Act
		let renderer = default_renderer(&settings).unwrap();

		// Assert
		assert!(renderer.has_template("backoffice/fields/select.html"));
		assert!(!renderer.has_template("regulate/fields/select.html"));
	}

	#[rstest]
	fn test_every_builtin_kind_is_registered() {
		// Arrange
		let renderer = default_renderer(&AdminSettings::default()).unwrap();

		// Act & Assert
		for (kind, _) in BUILTIN {
			assert!(renderer.has_template(&format!("regulate/fields/{}.html", kind)), "{}", kind);
		}
	}
}
