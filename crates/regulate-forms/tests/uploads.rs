//! Upload fields against a real disk

use chrono::{TimeZone, Utc};
use regulate_core::{AdminSettings, LocalStorage, Storage};
use regulate_forms::{
	Applied, ApplyContext, BuildContext, ConfigureUpload, File, ManageableField, SubmittedInput,
	UploadedFile,
};
use regulate_test::fixtures::temp_storage;
use regulate_test::{PlainHasher, TestRecord};
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;

#[rstest]
fn test_upload_then_remove_round_trip(temp_storage: (TempDir, LocalStorage)) {
	// Arrange
	let (_dir, storage) = temp_storage;
	let settings = AdminSettings::default();
	let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
	let cx = ApplyContext::new(&storage, &PlainHasher, &settings).with_now(now);
	let record = TestRecord::new("Invoice").with_next_primary_key(12);
	let mut field = File::new(&BuildContext::new(&record, &settings), "scan", "invoices")
		.unwrap()
		.filename("invoice-{id}");
	let upload = SubmittedInput::new()
		.with_file("scan", UploadedFile::new("scan.PDF", b"%PDF-1.7".to_vec()));

	// Act
	let stored = field.apply_submitted_value(&upload, None, &cx).unwrap();

	// Assert
	assert_eq!(stored, Applied::Set(json!("invoices/invoice-12.pdf")));
	assert!(storage.exists("invoices/invoice-12.pdf"));

	// Arrange
	let saved = TestRecord::existing("Invoice", 12).with_attribute("scan", "invoices/invoice-12.pdf");
	let mut field = File::new(&BuildContext::new(&saved, &settings), "scan", "invoices").unwrap();
	let removal = SubmittedInput::new().with("scan", settings.uploads.remove_value.as_str());

	// Act
	let removed = field
		.apply_submitted_value(&removal, removal.get("scan"), &cx)
		.unwrap();

	// Assert
	assert_eq!(removed, Applied::Set(Value::Null));
	assert!(!storage.exists("invoices/invoice-12.pdf"));
}
