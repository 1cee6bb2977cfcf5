//! Select with a live-filtered search box

use crate::context::{BuildContext, RenderContext};
use crate::field::{FieldCore, ManageableField, base_template_data};
use crate::resolver::value_to_string;
use indexmap::IndexMap;
use regulate_core::{AdminSettings, Result};
use serde_json::{Value, json};
use std::ops::BitOr;

/// Behaviour flags of a [`SearchableValue`]. Flags combine with `|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchMode(u8);

impl SearchMode {
	pub const NONE: Self = Self(0);
	/// Select the first item when no value is set
	pub const SELECT_FIRST: Self = Self(1);
	/// Show every item when the empty search box is focused
	pub const SHOW_ALL: Self = Self(2);

	pub fn bits(self) -> u8 {
		self.0
	}

	/// Whether every flag in `flag` is set
	pub fn contains(self, flag: Self) -> bool {
		self.0 & flag.0 == flag.0
	}
}

impl BitOr for SearchMode {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		Self(self.0 | rhs.0)
	}
}

/// Pick one item (key -> label) by typing part of its label or key
#[derive(Debug)]
pub struct SearchableValue {
	core: FieldCore,
	items: IndexMap<String, String>,
	mode: SearchMode,
	search: String,
	results: IndexMap<String, String>,
	focused: bool,
}

impl SearchableValue {
	/// # Examples
	///
	/// ```
	/// use regulate_core::AdminSettings;
	/// use regulate_forms::{BuildContext, ManageableField, SearchableValue};
	/// use regulate_forms::fields::SearchMode;
	/// use regulate_test::TestRecord;
	///
	/// let record = TestRecord::new("Order");
	/// let settings = AdminSettings::default();
	/// let cx = BuildContext::new(&record, &settings);
	///
	/// let mut country = SearchableValue::new(&cx, "country", [("no", "Norway"), ("nz", "New Zealand")])
	///     .unwrap()
	///     .mode(SearchMode::SELECT_FIRST | SearchMode::SHOW_ALL);
	/// assert_eq!(country.value(), "no");
	///
	/// country.search("zeal");
	/// assert_eq!(country.results().keys().collect::<Vec<_>>(), vec!["nz"]);
	/// ```
	pub fn new<K, V, I>(cx: &BuildContext<'_>, name: &str, items: I) -> Result<Self>
	where
		K: Into<String>,
		V: Into<String>,
		I: IntoIterator<Item = (K, V)>,
	{
		let mut field = Self {
			core: FieldCore::new(cx, name)?,
			items: items
				.into_iter()
				.map(|(key, label)| (key.into(), label.into()))
				.collect(),
			mode: SearchMode::NONE,
			search: String::new(),
			results: IndexMap::new(),
			focused: false,
		};
		field.post_constructed(cx.settings);
		Ok(field)
	}

	pub fn mode(mut self, mode: SearchMode) -> Self {
		self.mode = mode;
		self.core.options.set_extra("mode", mode.bits());
		if mode.contains(SearchMode::SELECT_FIRST)
			&& !self.has_value()
			&& let Some(first) = self.items.keys().next().cloned()
		{
			self.select(&first);
		}
		self
	}

	fn has_value(&self) -> bool {
		!value_to_string(self.core.value()).is_empty()
	}

	/// Update the search term and recompute the matching items
	pub fn search(&mut self, term: &str) {
		self.search = term.to_string();
		let needle = term.trim().to_lowercase();
		self.results = if needle.is_empty() {
			if self.focused && self.mode.contains(SearchMode::SHOW_ALL) {
				self.items.clone()
			} else {
				IndexMap::new()
			}
		} else {
			self.items
				.iter()
				.filter(|(key, label)| {
					label.to_lowercase().contains(&needle) || key.to_lowercase().contains(&needle)
				})
				.map(|(key, label)| (key.clone(), label.clone()))
				.collect()
		};
	}

	/// The search box received focus
	pub fn focus(&mut self) {
		self.focused = true;
		if self.search.trim().is_empty() && self.mode.contains(SearchMode::SHOW_ALL) {
			self.results = self.items.clone();
		}
	}

	/// The search box lost focus
	pub fn blur(&mut self) {
		self.focused = false;
	}

	/// Select an item by key. Unknown keys are ignored.
	pub fn select(&mut self, key: &str) -> bool {
		let Some(label) = self.items.get(key).cloned() else {
			return false;
		};
		self.core.set_value(Value::String(key.to_string()));
		self.search = label;
		self.results.clear();
		true
	}

	pub fn results(&self) -> &IndexMap<String, String> {
		&self.results
	}

	/// Label of the selected item
	pub fn selected_label(&self) -> Option<&str> {
		self.items
			.get(&value_to_string(self.core.value()))
			.map(String::as_str)
	}
}

impl ManageableField for SearchableValue {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn kind(&self) -> &'static str {
		"searchable_value"
	}

	fn post_constructed(&mut self, _settings: &AdminSettings) {
		if !self.items.is_empty() {
			let keys: Vec<&str> = self.items.keys().map(String::as_str).collect();
			self.core.rules.push(&format!("in:{}", keys.join(",")));
		}
	}

	fn template_data(&self, cx: &RenderContext<'_>) -> Value {
		let mut data = base_template_data(self, cx);
		data["search"] = Value::String(self.search.clone());
		data["selected_label"] = json!(self.selected_label());
		data["results"] = self
			.results
			.iter()
			.map(|(key, label)| json!({"key": key, "label": label}))
			.collect();
		data
	}
}
