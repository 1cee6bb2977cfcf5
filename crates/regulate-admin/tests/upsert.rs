//! End-to-end upsert submissions against in-memory records

use regulate_admin::{ManageableModel, UpsertOutcome, build_context, page_type, upsert};
use regulate_core::{AdminSettings, InMemoryStorage, Model, Result};
use regulate_forms::{
	ApplyContext, BuildContext, Configure, ConfigureUpload, File, ManageableField, MonetaryValue,
	PageType, SubmittedInput, Text, UploadedFile,
};
use regulate_test::{PlainHasher, TestRecord, init_test_logging};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Articles with a relation column, a JSON path, a price and an attachment.
/// `inline_calls` counts inline validation runs on the title.
struct Articles {
	inline_calls: Arc<AtomicUsize>,
}

impl Articles {
	fn new() -> Self {
		Self {
			inline_calls: Arc::new(AtomicUsize::new(0)),
		}
	}
}

impl ManageableModel for Articles {
	fn url_alias(&self) -> &str {
		"articles"
	}

	fn display_name(&self) -> &str {
		"Articles"
	}

	fn fields(&self, cx: &BuildContext<'_>) -> Result<Vec<Box<dyn ManageableField>>> {
		let calls = Arc::clone(&self.inline_calls);
		Ok(vec![
			Text::new(cx, "title")?
				.required()
				.validation("max:40")
				.inline_validation(move |value: &Value| {
					calls.fetch_add(1, Ordering::SeqCst);
					match value.as_str() {
						Some(title) if title.contains("lorem") => {
							Err("Placeholder titles are not allowed.".to_string())
						}
						_ => Ok(()),
					}
				})
				.boxed(),
			Text::new(cx, "author.name")?.boxed(),
			Text::new(cx, "meta->seo->title")?.boxed(),
			MonetaryValue::new(cx, "price")?.boxed(),
			File::new(cx, "attachment", "docs")?
				.filename("{id}")
				.boxed(),
			Text::new(cx, "slug")?
				.hide_from(&[PageType::Edit])
				.validation("required")
				.boxed(),
		])
	}
}

#[fixture]
fn settings() -> AdminSettings {
	init_test_logging();
	AdminSettings::default()
}

fn existing_article() -> TestRecord {
	TestRecord::existing("Article", 3)
		.with_attribute("title", "Old title")
		.with_attribute("meta", r#"{"seo":{"title":"Old"},"layout":"wide"}"#)
		.with_attribute("price", 500)
		.with_column("attachment")
		.with_relation(
			"author",
			TestRecord::existing("Author", 8).with_attribute("name", "Grace"),
		)
}

#[rstest]
fn test_edit_submission_writes_every_path_and_saves(settings: AdminSettings) {
	// Arrange
	let admin = Articles::new();
	let storage = InMemoryStorage::new("/storage");
	let hasher = PlainHasher;
	let cx = ApplyContext::new(&storage, &hasher, &settings);
	let mut context = build_context(&admin, Box::new(existing_article()), &settings).unwrap();
	let input = SubmittedInput::new()
		.with("title", "New title")
		.with("author~name", "Ada")
		.with("meta->seo->title", "Fresh")
		.with("price", "12.34")
		.with_file("attachment", UploadedFile::new("Report.PDF", b"%PDF".to_vec()));

	// Act
	let outcome = upsert(&admin, &mut context, input, &cx).unwrap();

	// Assert
	assert_eq!(
		outcome,
		UpsertOutcome::Saved {
			redirect: "/articles/browse".to_string()
		}
	);
	let model = context.model();
	assert_eq!(model.get_attribute("title"), Some(json!("New title")));
	assert_eq!(model.get_attribute("price"), Some(json!(1234)));
	assert_eq!(model.get_attribute("attachment"), Some(json!("docs/3.pdf")));
	let meta: Value = serde_json::from_str(
		model.get_attribute("meta").unwrap().as_str().unwrap(),
	)
	.unwrap();
	assert_eq!(meta, json!({"seo": {"title": "Fresh"}, "layout": "wide"}));
	let author = model.relation("author").unwrap().unwrap();
	assert_eq!(author.get_attribute("name"), Some(json!("Ada")));
	assert_eq!(storage.read("docs/3.pdf"), Some(b"%PDF".to_vec()));
}

#[rstest]
fn test_inline_validation_waits_for_standard_rules(settings: AdminSettings) {
	// Arrange
	let admin = Articles::new();
	let storage = InMemoryStorage::new("/storage");
	let hasher = PlainHasher;
	let cx = ApplyContext::new(&storage, &hasher, &settings);
	let mut context = build_context(&admin, Box::new(existing_article()), &settings).unwrap();
	let input = SubmittedInput::new()
		.with("title", "lorem ipsum")
		.with("price", "not money");

	// Act
	let outcome = upsert(&admin, &mut context, input, &cx).unwrap();

	// Assert
	assert!(!outcome.is_saved());
	assert!(!outcome.errors_for("price").is_empty());
	assert!(outcome.errors_for("title").is_empty());
	assert_eq!(admin.inline_calls.load(Ordering::SeqCst), 0);
	assert_eq!(context.model().get_attribute("title"), Some(json!("Old title")));
}

#[rstest]
fn test_inline_failure_blocks_persistence(settings: AdminSettings) {
	// Arrange
	let admin = Articles::new();
	let storage = InMemoryStorage::new("/storage");
	let hasher = PlainHasher;
	let cx = ApplyContext::new(&storage, &hasher, &settings);
	let mut context = build_context(&admin, Box::new(existing_article()), &settings).unwrap();
	let input = SubmittedInput::new()
		.with("title", "lorem ipsum")
		.with("price", "1.00")
		.with_file("attachment", UploadedFile::new("a.txt", b"a".to_vec()));

	// Act
	let outcome = upsert(&admin, &mut context, input, &cx).unwrap();

	// Assert
	assert_eq!(outcome.errors_for("title"), ["Placeholder titles are not allowed."]);
	assert_eq!(admin.inline_calls.load(Ordering::SeqCst), 1);
	assert!(storage.paths().is_empty());
	match outcome {
		UpsertOutcome::Invalid { old_input, .. } => {
			assert_eq!(old_input.get("title"), Some(&json!("lorem ipsum")));
		}
		other => panic!("expected invalid outcome, got {:?}", other),
	}
}

#[rstest]
fn test_create_page_validates_create_only_fields(settings: AdminSettings) {
	// Arrange
	let admin = Articles::new();
	let storage = InMemoryStorage::new("/storage");
	let hasher = PlainHasher;
	let cx = ApplyContext::new(&storage, &hasher, &settings);
	let record = TestRecord::new("Article")
		.with_empty_relation("author")
		.with_next_primary_key(11);
	let mut context = build_context(&admin, Box::new(record), &settings).unwrap();
	assert_eq!(page_type(&context), PageType::Create);

	// Act
	let outcome = upsert(
		&admin,
		&mut context,
		SubmittedInput::new().with("title", "Hello"),
		&cx,
	)
	.unwrap();

	// Assert
	assert_eq!(outcome.errors_for("slug"), ["The Slug field is required."]);
}

#[rstest]
fn test_create_submission_saves_with_next_key(settings: AdminSettings) {
	// Arrange
	let admin = Articles::new();
	let storage = InMemoryStorage::new("/storage");
	let hasher = PlainHasher;
	let cx = ApplyContext::new(&storage, &hasher, &settings);
	let record = TestRecord::new("Article")
		.with_relation("author", TestRecord::new("Author"))
		.with_next_primary_key(11);
	let mut context = build_context(&admin, Box::new(record), &settings).unwrap();
	let input = SubmittedInput::new()
		.with("title", "Hello")
		.with("slug", "hello")
		.with_file("attachment", UploadedFile::new("notes.md", b"# hi".to_vec()));

	// Act
	let outcome = upsert(&admin, &mut context, input, &cx).unwrap();

	// Assert
	assert!(outcome.is_saved());
	let model = context.model();
	assert_eq!(model.primary_key(), Some(json!(11)));
	assert_eq!(model.get_attribute("slug"), Some(json!("hello")));
	assert_eq!(model.get_attribute("attachment"), Some(json!("docs/11.md")));
	let meta: Value = serde_json::from_str(
		model.get_attribute("meta").unwrap().as_str().unwrap(),
	)
	.unwrap();
	assert_eq!(meta, json!({"seo": {"title": null}}));
}
