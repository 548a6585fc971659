//! Validate-then-render cycles over whole schemas.

mod common;
use common::*;

use formgen::fields::{checkbox_group_field, text_field};
use formgen::{
    validate, FieldDescriptor, FieldError, FormData, FormMethod, FormSchema, LocalUploadStore,
    Submission,
};

fn store() -> (tempfile::TempDir, LocalUploadStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalUploadStore::new(dir.path().join("uploads"));
    (dir, store)
}

#[test]
fn valid_submission_passes() {
    let (_dir, store) = store();
    let submission =
        body("name=Ada&email=a%40b.com&message=Hello+there+friend&subject=support");
    let (errors, ok) = validate(&contact_schema(), &submission, &store);
    assert!(ok, "unexpected errors: {errors}");
    assert!(errors.is_empty());
}

#[test]
fn empty_submission_reports_missing_required_only() {
    let (_dir, store) = store();
    let (errors, ok) = validate(&contact_schema(), &Submission::new(), &store);
    assert!(!ok);
    for name in ["name", "email", "message", "subject"] {
        assert_eq!(errors.get(name), Some(&FieldError::MissingRequired), "{name}");
    }
    assert!(!errors.contains("attachment"));
    assert_eq!(errors.len(), 4);
}

#[test]
fn email_and_textarea_rules() {
    let (_dir, store) = store();
    let submission = body("name=Ada&email=not-an-email&message=123456789&subject=other");
    let (errors, _) = validate(&contact_schema(), &submission, &store);
    assert_eq!(errors.get("email"), Some(&FieldError::InvalidFormat));
    assert_eq!(errors.get("message"), Some(&FieldError::TooShort { min: 10 }));
    assert_eq!(errors.len(), 2);

    let submission = body("name=Ada&email=a@b.com&message=1234567890&subject=other");
    let (errors, ok) = validate(&contact_schema(), &submission, &store);
    assert!(ok, "unexpected errors: {errors}");
}

#[test]
fn whitespace_only_counts_as_empty() {
    let (_dir, store) = store();
    let submission = body("name=+++&email=a@b.com&message=1234567890&subject=other");
    let (errors, _) = validate(&contact_schema(), &submission, &store);
    assert_eq!(errors.get("name"), Some(&FieldError::MissingRequired));
}

#[test]
fn disabled_required_field_is_skipped() {
    let (_dir, store) = store();
    let schema = FormSchema::with_method("/", FormMethod::Post)
        .field(text_field("locked", "Locked", true).disabled());
    let (errors, ok) = validate(&schema, &Submission::new(), &store);
    assert!(ok);
    assert!(errors.is_empty());
}

#[test]
fn get_form_ignores_body_channel() {
    let (_dir, store) = store();
    let schema =
        FormSchema::with_method("/search", FormMethod::Get).field(text_field("q", "Query", true));

    let posted = Submission::post(FormData::new().with("q", "rust"));
    let (errors, _) = validate(&schema, &posted, &store);
    assert_eq!(errors.get("q"), Some(&FieldError::MissingRequired));

    let queried = Submission::get(FormData::new().with("q", "rust"));
    let (_, ok) = validate(&schema, &queried, &store);
    assert!(ok);
}

#[test]
fn errors_do_not_leak_between_passes() {
    let (_dir, store) = store();
    let schema = contact_schema();

    let (first, _) = validate(&schema, &body("email=bad"), &store);
    assert!(first.contains("email"));
    assert!(first.contains("name"));

    let second_submission =
        body("name=Ada&email=a@b.com&message=long+enough+text&subject=billing");
    let (second, ok) = validate(&schema, &second_submission, &store);
    assert!(ok);
    assert!(second.is_empty());

    let html = schema.render(&second_submission, &second);
    assert!(!html.contains("class=\"error\""));
}

#[test]
fn checkbox_group_is_idempotent_and_sticky() {
    let (_dir, store) = store();
    let schema = FormSchema::with_method("/", FormMethod::Post).field(checkbox_group_field(
        "tags",
        "Tags",
        vec![("a", "A"), ("b", "B"), ("c", "C")],
        true,
    ));
    let submission = body("tags[]=a&tags[]=c");

    let first = validate(&schema, &submission, &store);
    let second = validate(&schema, &submission, &store);
    assert_eq!(first, second);
    assert!(first.1);

    let html = schema.render(&submission, &first.0);
    assert!(html.contains(r#"id="tags_a" value="a" checked"#));
    assert!(html.contains(r#"id="tags_b" value="b" required>"#));
    assert!(!html.contains(r#"value="b" checked"#));
    assert!(html.contains(r#"id="tags_c" value="c" checked"#));
}

#[test]
fn failed_pass_rerenders_sticky_values_and_errors() {
    let (_dir, store) = store();
    let schema = contact_schema();
    let submission = body("name=Ada&email=nope&message=short&subject=support");
    let (ok, errors) = schema.handle_submission(&submission, &store);
    assert!(!ok);

    let html = schema.render(&submission, &errors);
    assert!(html.contains(r#"value="Ada""#));
    assert!(html.contains(r#"<option value="support" selected>"#));
    assert!(html.contains("Enter a valid email address."));
    assert!(html.contains("Ensure this value has at least 10 characters."));
    assert!(html.contains(">short</textarea>"));
}

#[test]
fn duplicate_names_are_validated_independently() {
    let (_dir, store) = store();
    let schema = FormSchema::with_method("/", FormMethod::Post)
        .field(FieldDescriptor::new("x", "text", "X").required())
        .field(FieldDescriptor::new("x", "email", "X again"));
    let (errors, _) = validate(&schema, &body("x=plain"), &store);
    assert_eq!(errors.get("x"), Some(&FieldError::InvalidFormat));
}

#[test]
fn collection_on_scalar_fields_is_still_checked() {
    let (_dir, store) = store();
    let schema = FormSchema::with_method("/", FormMethod::Post)
        .field(FieldDescriptor::new("email", "email", "Email").required())
        .field(FieldDescriptor::new("msg", "textarea", "Message").required());
    let (errors, ok) = validate(&schema, &body("email[]=not-an-email&msg[]=short"), &store);
    assert!(!ok);
    assert_eq!(errors.get("email"), Some(&FieldError::InvalidFormat));
    assert_eq!(errors.get("msg"), Some(&FieldError::TooShort { min: 10 }));
}
