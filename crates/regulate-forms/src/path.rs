//! Parsed field paths
//!
//! A field name is parsed once, at construction, into one of three shapes:
//!
//! | Name                    | Path                                        |
//! |-------------------------|---------------------------------------------|
//! | `title`                 | `Column("title")`                           |
//! | `author.name`           | `Relation { author, name }`                 |
//! | `meta->seo->title`      | `Json { base: Column(meta), [seo, title] }` |
//! | `author.meta->links`    | `Json { base: Relation{..}, [links] }`      |

use crate::name_codec;
use regulate_core::{Error, Result};
use std::fmt;

const JSON_ARROW: &str = "->";

/// Where a field's value lives on a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
	/// A plain attribute of the model
	Column(String),
	/// An attribute of a related record
	Relation { relation: String, column: String },
	/// A key path inside a JSON column (or a related record's JSON column)
	Json {
		base: Box<FieldPath>,
		pointer: Vec<String>,
	},
}

impl FieldPath {
	/// Parse a field name.
	///
	/// Splits on the first `->` to find the JSON base; everything after it,
	/// split on both `->` and `.`, is the pointer. Without an arrow, the first
	/// `.` separates a relation from its column.
	///
	/// # Examples
	///
	/// ```
	/// use regulate_forms::FieldPath;
	///
	/// assert_eq!(FieldPath::parse("title").unwrap(), FieldPath::Column("title".into()));
	/// assert_eq!(
	///     FieldPath::parse("author.name").unwrap(),
	///     FieldPath::Relation { relation: "author".into(), column: "name".into() },
	/// );
	/// assert!(FieldPath::parse("meta->").is_err());
	/// ```
	pub fn parse(name: &str) -> Result<Self> {
		if name.is_empty() {
			return Err(Error::configuration("Field name must not be empty"));
		}
		if name_codec::contains_separator(name) {
			return Err(Error::configuration(format!(
				"Field name '{}' contains the reserved separator '{}'",
				name,
				name_codec::SEPARATOR
			)));
		}

		match name.split_once(JSON_ARROW) {
			Some((base, rest)) => {
				let base = Self::parse_base(name, base)?;
				let pointer: Vec<String> = rest
					.split(JSON_ARROW)
					.flat_map(|segment| segment.split('.'))
					.map(str::to_string)
					.collect();
				if pointer.iter().any(String::is_empty) {
					return Err(empty_segment(name));
				}
				Ok(Self::Json {
					base: Box::new(base),
					pointer,
				})
			}
			None => Self::parse_base(name, name),
		}
	}

	fn parse_base(name: &str, base: &str) -> Result<Self> {
		match base.split_once('.') {
			Some((relation, column)) => {
				if relation.is_empty() || column.split('.').any(str::is_empty) {
					return Err(empty_segment(name));
				}
				if column.contains('.') {
					return Err(Error::configuration(format!(
						"Field name '{}' traverses more than one relation",
						name
					)));
				}
				Ok(Self::Relation {
					relation: relation.to_string(),
					column: column.to_string(),
				})
			}
			None if base.is_empty() => Err(empty_segment(name)),
			None => Ok(Self::Column(base.to_string())),
		}
	}

	/// The relation this path traverses, if any
	pub fn relation(&self) -> Option<&str> {
		match self {
			Self::Column(_) => None,
			Self::Relation { relation, .. } => Some(relation),
			Self::Json { base, .. } => base.relation(),
		}
	}

	/// The column holding the value (the JSON column for JSON paths)
	pub fn column(&self) -> &str {
		match self {
			Self::Column(column) | Self::Relation { column, .. } => column,
			Self::Json { base, .. } => base.column(),
		}
	}

	pub fn is_json(&self) -> bool {
		matches!(self, Self::Json { .. })
	}

	/// The last segment of the path, the part shown to users
	pub fn last_segment(&self) -> &str {
		match self {
			Self::Json { pointer, base } => pointer
				.last()
				.map(String::as_str)
				.unwrap_or_else(|| base.last_segment()),
			_ => self.column().rsplit('.').next().unwrap_or_default(),
		}
	}

	/// Human label derived from the last segment
	///
	/// # Examples
	///
	/// ```
	/// use regulate_forms::FieldPath;
	///
	/// let path = FieldPath::parse("settings->theme->primary_color").unwrap();
	/// assert_eq!(path.label(), "Primary color");
	/// ```
	pub fn label(&self) -> String {
		humanize(self.last_segment())
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Column(column) => write!(f, "{}", column),
			Self::Relation { relation, column } => write!(f, "{}.{}", relation, column),
			Self::Json { base, pointer } => write!(f, "{}->{}", base, pointer.join(JSON_ARROW)),
		}
	}
}

fn empty_segment(name: &str) -> Error {
	Error::configuration(format!("Field name '{}' has an empty segment", name))
}

/// Derive a display label from a raw field name.
///
/// Keeps only what follows the last `.` and then the last `->`, replaces
/// underscores with spaces and upper-cases the first letter.
///
/// # Examples
///
/// ```
/// use regulate_forms::path::label_from_name;
///
/// assert_eq!(label_from_name("author.first_name"), "First name");
/// assert_eq!(label_from_name("meta->seo->og_title"), "Og title");
/// assert_eq!(label_from_name("title"), "Title");
/// ```
pub fn label_from_name(name: &str) -> String {
	let after_dot = name.rsplit('.').next().unwrap_or(name);
	let after_arrow = after_dot.rsplit(JSON_ARROW).next().unwrap_or(after_dot);
	humanize(after_arrow)
}

fn humanize(segment: &str) -> String {
	let spaced = segment.replace('_', " ");
	let mut chars = spaced.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
