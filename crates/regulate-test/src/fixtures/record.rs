use regulate_core::{Error, Model, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// In-memory [`Model`] for tests
///
/// Attributes set through the builders do not count as writes; only
/// [`Model::set_attribute`] calls do. Relations are declared explicitly;
/// following an undeclared relation yields [`Error::UnknownRelation`].
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
	model_name: String,
	attributes: BTreeMap<String, Value>,
	columns: BTreeSet<String>,
	relations: BTreeMap<String, Option<TestRecord>>,
	creating: bool,
	next_primary_key: Option<i64>,
	writes: usize,
	saves: usize,
}

impl TestRecord {
	/// A record being created (no primary key yet)
	pub fn new(model_name: impl Into<String>) -> Self {
		Self {
			model_name: model_name.into(),
			attributes: BTreeMap::new(),
			columns: BTreeSet::from(["id".to_string()]),
			relations: BTreeMap::new(),
			creating: true,
			next_primary_key: None,
			writes: 0,
			saves: 0,
		}
	}

	/// An existing record with primary key `id`
	pub fn existing(model_name: impl Into<String>, id: i64) -> Self {
		let mut record = Self::new(model_name).with_attribute("id", id);
		record.creating = false;
		record
	}

	/// Set a column value without counting it as a write
	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		let name = name.into();
		self.columns.insert(name.clone());
		self.attributes.insert(name, value.into());
		self
	}

	/// Declare a column that has no value yet
	pub fn with_column(mut self, name: impl Into<String>) -> Self {
		self.columns.insert(name.into());
		self
	}

	/// Attach a related record
	pub fn with_relation(mut self, name: impl Into<String>, related: TestRecord) -> Self {
		self.relations.insert(name.into(), Some(related));
		self
	}

	/// Declare a relation with no related record
	pub fn with_empty_relation(mut self, name: impl Into<String>) -> Self {
		self.relations.insert(name.into(), None);
		self
	}

	pub fn with_next_primary_key(mut self, id: i64) -> Self {
		self.next_primary_key = Some(id);
		self
	}

	/// Number of [`Model::set_attribute`] calls on this record
	pub fn write_count(&self) -> usize {
		self.writes
	}

	/// Number of [`Model::save`] calls on this record
	pub fn save_count(&self) -> usize {
		self.saves
	}

	/// The related record, if declared and attached
	pub fn related(&self, name: &str) -> Option<&TestRecord> {
		self.relations.get(name).and_then(Option::as_ref)
	}

	fn unknown_relation(&self, name: &str) -> Error {
		Error::UnknownRelation {
			model: self.model_name.clone(),
			relation: name.to_string(),
		}
	}
}

impl Model for TestRecord {
	fn model_name(&self) -> &str {
		&self.model_name
	}

	fn get_attribute(&self, name: &str) -> Option<Value> {
		self.attributes.get(name).cloned()
	}

	fn set_attribute(&mut self, name: &str, value: Value) {
		self.writes += 1;
		self.columns.insert(name.to_string());
		self.attributes.insert(name.to_string(), value);
	}

	fn has_column(&self, name: &str) -> bool {
		self.columns.contains(name)
	}

	fn relation(&self, name: &str) -> Result<Option<&dyn Model>> {
		match self.relations.get(name) {
			Some(related) => Ok(related.as_ref().map(|record| record as &dyn Model)),
			None => Err(self.unknown_relation(name)),
		}
	}

	fn relation_mut(&mut self, name: &str) -> Result<Option<&mut dyn Model>> {
		if !self.relations.contains_key(name) {
			return Err(self.unknown_relation(name));
		}
		Ok(self
			.relations
			.get_mut(name)
			.and_then(Option::as_mut)
			.map(|record| record as &mut dyn Model))
	}

	fn is_being_created(&self) -> bool {
		self.creating
	}

	fn next_primary_key(&self) -> Option<i64> {
		self.next_primary_key
	}

	fn save(&mut self) -> Result<()> {
		if self.creating
			&& self.primary_key().is_none()
			&& let Some(id) = self.next_primary_key.take()
		{
			self.attributes.insert("id".to_string(), Value::from(id));
		}
		self.creating = false;
		self.saves += 1;
		tracing::debug!(model = %self.model_name, saves = self.saves, "saved test record");
		Ok(())
	}
}
