//! Browse columns: read-only rendering of resolved values for list views

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regulate_core::html::{escape, truncate_chars};
use regulate_core::{AdminSettings, Model, Result, Storage};
use regulate_forms::path::label_from_name;
use regulate_forms::resolver::{self, value_to_string};
use regulate_forms::FieldPath;
use std::fmt;

/// How a column presents its value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnKind {
	#[default]
	Text,
	/// `<img>` pointing at the storage URL of the stored path
	Image,
	/// A yes/no pair chosen by the value's truthiness
	Boolean { yes: String, no: String },
}

/// One step of the render pipeline, applied after truncation and escaping
#[derive(Clone)]
pub enum RenderTransform {
	/// Re-format a date or datetime with a chrono format string
	DateFormat(String),
	/// Wrap in a link; `{value}` and `{id}` in `href` are replaced
	Link { href: String },
	Prefix(String),
	Suffix(String),
	/// Arbitrary transform of the current output
	Map(fn(&str, &dyn Model) -> String),
}

impl fmt::Debug for RenderTransform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DateFormat(format) => f.debug_tuple("DateFormat").field(format).finish(),
			Self::Link { href } => f.debug_struct("Link").field("href", href).finish(),
			Self::Prefix(prefix) => f.debug_tuple("Prefix").field(prefix).finish(),
			Self::Suffix(suffix) => f.debug_tuple("Suffix").field(suffix).finish(),
			Self::Map(_) => f.write_str("Map(..)"),
		}
	}
}

impl RenderTransform {
	/// Apply this step. `raw` is the unformatted resolved value.
	fn apply(&self, current: String, raw: &str, model: &dyn Model) -> String {
		match self {
			Self::DateFormat(format) => match parse_datetime(raw) {
				Some(datetime) => datetime.format(format).to_string(),
				None => current,
			},
			Self::Link { href } => {
				let id = model
					.primary_key()
					.map(|id| value_to_string(&id))
					.unwrap_or_default();
				let href = href.replace("{value}", raw).replace("{id}", &id);
				format!(r#"<a href="{}">{}</a>"#, escape(&href), current)
			}
			Self::Prefix(prefix) => format!("{}{}", prefix, current),
			Self::Suffix(suffix) => format!("{}{}", current, suffix),
			Self::Map(map) => map(&current, model),
		}
	}
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
	let raw = raw.trim();
	DateTime::parse_from_rfc3339(raw)
		.map(|datetime| datetime.naive_utc())
		.or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
		.ok()
		.or_else(|| {
			NaiveDate::parse_from_str(raw, "%Y-%m-%d")
				.ok()
				.and_then(|date| date.and_hms_opt(0, 0, 0))
		})
}

/// Collaborators a column needs while rendering
#[derive(Clone, Copy)]
pub struct ColumnContext<'a> {
	pub settings: &'a AdminSettings,
	pub storage: Option<&'a dyn Storage>,
}

impl<'a> ColumnContext<'a> {
	pub fn new(settings: &'a AdminSettings) -> Self {
		Self {
			settings,
			storage: None,
		}
	}

	pub fn with_storage(mut self, storage: &'a dyn Storage) -> Self {
		self.storage = Some(storage);
		self
	}
}

/// A browse column bound to a column, relation column or JSON path
///
/// Rendering runs: resolve, truncate to `max_chars`, escape unless
/// `render_html`, then every [`RenderTransform`] in order.
///
/// # Examples
///
/// ```
/// use regulate_admin::browse::{BrowseColumn, ColumnContext};
/// use regulate_core::AdminSettings;
/// use regulate_test::TestRecord;
///
/// let settings = AdminSettings::default();
/// let post = TestRecord::existing("Post", 9).with_attribute("title", "<Rust> & friends");
///
/// let title = BrowseColumn::new("title")
///     .unwrap()
///     .max_chars(6)
///     .link("/posts/{id}");
///
/// assert_eq!(
///     title.render(&post, ColumnContext::new(&settings)).unwrap(),
///     r#"<a href="/posts/9">&lt;Rust&gt;...</a>"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct BrowseColumn {
	name: String,
	path: FieldPath,
	label: Option<String>,
	kind: ColumnKind,
	max_chars: Option<usize>,
	render_html: bool,
	sortable: bool,
	transforms: Vec<RenderTransform>,
}

impl BrowseColumn {
	pub fn new(name: &str) -> Result<Self> {
		Ok(Self {
			name: name.to_string(),
			path: FieldPath::parse(name)?,
			label: None,
			kind: ColumnKind::Text,
			max_chars: None,
			render_html: false,
			sortable: false,
			transforms: Vec::new(),
		})
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn image(mut self) -> Self {
		self.kind = ColumnKind::Image;
		self
	}

	pub fn boolean(mut self, yes: impl Into<String>, no: impl Into<String>) -> Self {
		self.kind = ColumnKind::Boolean {
			yes: yes.into(),
			no: no.into(),
		};
		self
	}

	/// Truncate the value to `max` characters, overriding the settings default
	pub fn max_chars(mut self, max: usize) -> Self {
		self.max_chars = Some(max);
		self
	}

	/// Emit the value without HTML escaping
	pub fn render_html(mut self) -> Self {
		self.render_html = true;
		self
	}

	/// Allow ordering the browse list by this column
	pub fn sortable(mut self) -> Self {
		self.sortable = true;
		self
	}

	/// Append a render transform
	pub fn transform(mut self, transform: RenderTransform) -> Self {
		self.transforms.push(transform);
		self
	}

	pub fn date_format(self, format: &str) -> Self {
		self.transform(RenderTransform::DateFormat(format.to_string()))
	}

	pub fn link(self, href: &str) -> Self {
		self.transform(RenderTransform::Link {
			href: href.to_string(),
		})
	}

	pub fn prefix(self, prefix: &str) -> Self {
		self.transform(RenderTransform::Prefix(prefix.to_string()))
	}

	pub fn suffix(self, suffix: &str) -> Self {
		self.transform(RenderTransform::Suffix(suffix.to_string()))
	}

	pub fn map(self, map: fn(&str, &dyn Model) -> String) -> Self {
		self.transform(RenderTransform::Map(map))
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn path(&self) -> &FieldPath {
		&self.path
	}

	pub fn kind(&self) -> &ColumnKind {
		&self.kind
	}

	pub fn is_sortable(&self) -> bool {
		self.sortable
	}

	pub fn transforms(&self) -> &[RenderTransform] {
		&self.transforms
	}

	pub fn label(&self) -> String {
		self.label
			.clone()
			.unwrap_or_else(|| label_from_name(&self.name))
	}

	/// Render the column for one record
	pub fn render(&self, model: &dyn Model, cx: ColumnContext<'_>) -> Result<String> {
		let raw = value_to_string(&resolver::resolve(model, &self.path)?);
		let base = match &self.kind {
			ColumnKind::Text => {
				let text = match self.max_chars.or(cx.settings.browse.max_chars) {
					Some(max) => truncate_chars(&raw, max, &cx.settings.browse.ellipsis),
					None => raw.clone(),
				};
				self.escape(&text)
			}
			ColumnKind::Image if raw.is_empty() => String::new(),
			ColumnKind::Image => {
				let src = match cx.storage {
					Some(storage) => storage.url(&raw),
					None => raw.clone(),
				};
				format!(
					r#"<img src="{}" alt="{}">"#,
					escape(&src),
					escape(&self.label())
				)
			}
			ColumnKind::Boolean { yes, no } => {
				let truthy = !matches!(raw.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "off" | "no");
				self.escape(if truthy { yes } else { no })
			}
		};
		Ok(self
			.transforms
			.iter()
			.fold(base, |current, transform| transform.apply(current, &raw, model)))
	}

	fn escape(&self, text: &str) -> String {
		if self.render_html {
			text.to_string()
		} else {
			escape(text)
		}
	}
}

/// Render one record across a set of columns
pub fn render_row(columns: &[BrowseColumn], model: &dyn Model, cx: ColumnContext<'_>) -> Result<Vec<String>> {
	columns.iter().map(|column| column.render(model, cx)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use regulate_core::InMemoryStorage;
	use regulate_test::TestRecord;
	use rstest::rstest;

	fn shout(text: &str, _model: &dyn Model) -> String {
		text.to_uppercase()
	}

	#[rstest]
	#[case(BrowseColumn::new("title").unwrap(), "<b>Hi</b>", "&lt;b&gt;Hi&lt;/b&gt;")]
	#[case(BrowseColumn::new("title").unwrap().render_html(), "<b>Hi</b>", "<b>Hi</b>")]
	#[case(BrowseColumn::new("title").unwrap().max_chars(3), "Hello", "Hel...")]
	#[case(BrowseColumn::new("title").unwrap().prefix("#").suffix("!"), "7", "#7!")]
	#[case(BrowseColumn::new("title").unwrap().map(shout).prefix("> "), "quiet", "> QUIET")]
	fn test_text_pipeline(#[case] column: BrowseColumn, #[case] stored: &str, #[case] expected: &str) {
		// Arrange
		let settings = AdminSettings::default();
		let record = TestRecord::existing("Post", 1).with_attribute("title", stored);

		// Act
		let html = column.render(&record, ColumnContext::new(&settings)).unwrap();

		// Assert
		assert_eq!(html, expected);
	}

	#[rstest]
	fn test_truncation_happens_before_escaping() {
		// Arrange
		let settings = AdminSettings::default();
		let record = TestRecord::existing("Post", 1).with_attribute("title", "a&b&c");
		let column = BrowseColumn::new("title").unwrap().max_chars(2);

		// Act
		let html = column.render(&record, ColumnContext::new(&settings)).unwrap();

		// Assert
		assert_eq!(html, "a&amp;...");
	}

	#[rstest]
	#[case("2024-03-05T10:30:00Z")]
	#[case("2024-03-05 10:30:00")]
	fn test_date_then_link_layers_in_order(#[case] stored: &str) {
		// Arrange
		let settings = AdminSettings::default();
		let record = TestRecord::existing("Post", 4).with_attribute("published_at", stored);
		let column = BrowseColumn::new("published_at")
			.unwrap()
			.date_format("%d.%m.%Y")
			.link("/posts/{id}");

		// Act
		let html = column.render(&record, ColumnContext::new(&settings)).unwrap();

		// Assert
		assert_eq!(html, r#"<a href="/posts/4">05.03.2024</a>"#);
	}

	#[rstest]
	fn test_unparseable_date_is_left_alone() {
		// Arrange
		let settings = AdminSettings::default();
		let record = TestRecord::existing("Post", 4).with_attribute("published_at", "soon");
		let column = BrowseColumn::new("published_at").unwrap().date_format("%Y");

		// Act & Assert
		assert_eq!(column.render(&record, ColumnContext::new(&settings)).unwrap(), "soon");
	}

	#[rstest]
	fn test_missing_relation_renders_empty() {
		// Arrange
		let settings = AdminSettings::default();
		let record = TestRecord::existing("Post", 1).with_empty_relation("author");
		let column = BrowseColumn::new("author.name").unwrap();

		// Act & Assert
		assert_eq!(column.render(&record, ColumnContext::new(&settings)).unwrap(), "");
	}

	#[rstest]
	#[case("avatars/1.png", r#"<img src="/storage/avatars/1.png" alt="Avatar">"#)]
	#[case("", "")]
	fn test_image_column(#[case] stored: &str, #[case] expected: &str) {
		// Arrange
		let settings = AdminSettings::default();
		let storage = InMemoryStorage::new("/storage");
		let record = TestRecord::existing("User", 1).with_attribute("avatar", stored);
		let column = BrowseColumn::new("avatar").unwrap().image();

		// Act
		let html = column
			.render(&record, ColumnContext::new(&settings).with_storage(&storage))
			.unwrap();

		// Assert
		assert_eq!(html, expected);
	}

	#[rstest]
	#[case(serde_json::json!(true), "Yes")]
	#[case(serde_json::json!(1), "Yes")]
	#[case(serde_json::json!(false), "No")]
	#[case(serde_json::json!("0"), "No")]
	#[case(serde_json::Value::Null, "No")]
	fn test_boolean_column(#[case] stored: serde_json::Value, #[case] expected: &str) {
		// Arrange
		let settings = AdminSettings::default();
		let record = TestRecord::existing("User", 1).with_attribute("active", stored);
		let column = BrowseColumn::new("active").unwrap().boolean("Yes", "No");

		// Act & Assert
		assert_eq!(column.render(&record, ColumnContext::new(&settings)).unwrap(), expected);
	}

	#[rstest]
	fn test_render_row_follows_column_order() {
		// Arrange
		let settings = AdminSettings::default();
		let record = TestRecord::existing("User", 3).with_attribute("name", "Ada");
		let columns = vec![
			BrowseColumn::new("id").unwrap(),
			BrowseColumn::new("name").unwrap(),
		];

		// Act
		let row = render_row(&columns, &record, ColumnContext::new(&settings)).unwrap();

		// Assert
		assert_eq!(row, vec!["3", "Ada"]);
	}
}
