//! Rendering a complete field set through the built-in Tera templates

use regulate_core::{AdminSettings, InMemoryStorage, Storage};
use regulate_forms::context::render_fields;
use regulate_forms::templates::default_renderer;
use regulate_forms::{
	BuildContext, Configure, ConfigureUpload, Image, ManageableField, ModelContext, PageType,
	Password, RenderContext, Select, SubmittedInput, Text,
};
use regulate_test::{TestRecord, init_test_logging};
use rstest::{fixture, rstest};

#[fixture]
fn profile_form() -> ModelContext {
	init_test_logging();
	let settings = AdminSettings::default();
	let record = TestRecord::existing("User", 1)
		.with_attribute("email", "ada@example.com")
		.with_attribute("password", "stored-hash")
		.with_attribute("role", "editor")
		.with_attribute("avatar", "avatars/1.png")
		.with_relation(
			"profile",
			TestRecord::existing("Profile", 4).with_attribute("city", "Oslo"),
		);

	ModelContext::build(Box::new(record), &settings, |cx: &BuildContext<'_>| {
		Ok(vec![
			Text::new(cx, "email")?.required().input_type("email").boxed(),
			Text::new(cx, "profile.city")?.with_label("Home town").boxed(),
			Password::new(cx, "password")?.boxed(),
			Select::new(cx, "role", [("admin", "Administrator"), ("editor", "Editor")])?.boxed(),
			Image::new(cx, "avatar", "avatars")?
				.unlink_old()
				.hide_from(&[PageType::Create])
				.boxed(),
			Text::new(cx, "created_at")?
				.show_only_on(&[PageType::Browse])
				.boxed(),
		])
	})
	.unwrap()
}

#[rstest]
fn test_edit_form_renders_visible_fields(profile_form: ModelContext) {
	// Arrange
	let settings = AdminSettings::default();
	let renderer = default_renderer(&settings).unwrap();
	let storage = InMemoryStorage::new("/storage");
	let cx = RenderContext::new(&renderer, &settings, PageType::Edit).with_storage(&storage);

	// Act
	let html = render_fields(profile_form.fields(), cx).unwrap();

	// Assert
	assert!(html.contains(r#"<div class="regulate-field" data-field="profile~city">"#));
	assert!(html.contains(r#"<input name="profile~city" value="Oslo" type="text">"#));
	assert!(html.contains(r#"<label for="profile~city">Home town</label>"#));
	assert!(html.contains(r#"<input type="checkbox" name="password_change" value="1">"#));
	assert!(html.contains(r#"<option value="editor" selected>Editor</option>"#));
	assert!(html.contains(r#"value="__remove__""#));
	assert!(!html.contains("stored-hash"));
	assert!(!html.contains(r#"data-field="created_at""#));
}

#[rstest]
fn test_browse_page_renders_only_browse_fields(profile_form: ModelContext) {
	// Arrange
	let settings = AdminSettings::default();
	let renderer = default_renderer(&settings).unwrap();
	let cx = RenderContext::new(&renderer, &settings, PageType::Browse);

	// Act
	let html = render_fields(profile_form.fields(), cx).unwrap();

	// Assert
	assert!(html.contains(r#"data-field="created_at""#));
	assert!(!html.contains(r#"data-field="email""#));
}

#[rstest]
fn test_old_input_wins_over_model_value(profile_form: ModelContext) {
	// Arrange
	let settings = AdminSettings::default();
	let renderer = default_renderer(&settings).unwrap();
	let old = SubmittedInput::new()
		.with("profile~city", "Bergen")
		.with("password", "typed-secret");
	let cx = RenderContext::new(&renderer, &settings, PageType::Edit).with_old_input(&old);

	// Act
	let html = render_fields(profile_form.fields(), cx).unwrap();

	// Assert
	assert!(html.contains(r#"value="Bergen""#));
	assert!(!html.contains("typed-secret"));
}

#[rstest]
fn test_siblings_are_visible_during_render(profile_form: ModelContext) {
	// Arrange
	let settings = AdminSettings::default();
	let renderer = regulate_test::RecordingRenderer::new("");
	let cx = RenderContext::new(&renderer, &settings, PageType::Edit);

	// Act
	render_fields(profile_form.fields(), cx).unwrap();

	// Assert
	let calls = renderer.calls();
	let (_, city_data) = calls
		.iter()
		.find(|(template, _)| template == "regulate/fields/text.html")
		.unwrap();
	assert_eq!(city_data["siblings"]["profile~city"], "Oslo");
	assert_eq!(city_data["siblings"]["role"], "editor");
}

#[rstest]
fn test_image_preview_uses_storage_url(profile_form: ModelContext) {
	// Arrange
	let settings = AdminSettings::default();
	let renderer = regulate_test::RecordingRenderer::new("");
	let storage = InMemoryStorage::new("/storage");
	let cx = RenderContext::new(&renderer, &settings, PageType::Edit).with_storage(&storage);
	let avatar = &profile_form.fields()[4];

	// Act
	let data = avatar.template_data(&cx);

	// Assert
	assert_eq!(data["url"], storage.url("avatars/1.png"));
}
