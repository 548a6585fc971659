//! Form field validators and the validation pass.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{FieldError, ValidationErrors};
use crate::schema::{FieldDescriptor, FieldKind, FormSchema};
use crate::submission::{FieldValue, Submission};
use crate::upload::{handle_upload, UploadStore};

/// Minimum number of characters a non-empty textarea must hold.
pub const TEXTAREA_MIN_LENGTH: usize = 10;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a trimmed value and returns the failure if invalid.
    fn validate(&self, value: &str) -> Result<(), FieldError>;
}

/// Validator that requires a non-empty value.
#[derive(Debug, Clone, Default)]
pub struct RequiredValidator;

impl RequiredValidator {
    /// Creates a new RequiredValidator.
    pub fn new() -> Self {
        Self
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &str) -> Result<(), FieldError> {
        if value.trim().is_empty() {
            Err(FieldError::MissingRequired)
        } else {
            Ok(())
        }
    }
}

/// Validator that enforces a minimum length in characters.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    min_length: usize,
}

impl MinLengthValidator {
    /// Creates a new MinLengthValidator.
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &str) -> Result<(), FieldError> {
        if value.chars().count() < self.min_length {
            Err(FieldError::TooShort {
                min: self.min_length,
            })
        } else {
            Ok(())
        }
    }
}

/// Validator for email addresses.
#[derive(Debug, Clone, Default)]
pub struct EmailValidator;

impl EmailValidator {
    /// Creates a new EmailValidator.
    pub fn new() -> Self {
        Self
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), FieldError> {
        if EMAIL_RE.is_match(value) {
            Ok(())
        } else {
            Err(FieldError::InvalidFormat)
        }
    }
}

/// Runs one validation pass over every field of `schema`.
///
/// The returned error map is fresh for this call; the flag is `true` when
/// it is empty. File fields are handed to [`handle_upload`], which may
/// persist accepted files through `store`.
pub fn validate(
    schema: &FormSchema,
    submission: &Submission,
    store: &dyn UploadStore,
) -> (ValidationErrors, bool) {
    let mut errors = ValidationErrors::new();

    for field in schema.fields() {
        if field.is_disabled() {
            continue;
        }

        let outcome = match field.kind {
            FieldKind::File => {
                handle_upload(field, submission.files.get(&field.name), store).map(|_| ())
            }
            _ => validate_value(field, submission.value(schema.method(), &field.name)),
        };

        if let Err(error) = outcome {
            errors.add(&field.name, error);
        }
    }

    let ok = errors.is_empty();
    debug!(
        fields = schema.fields().len(),
        errors = errors.len(),
        "validated submission"
    );
    (errors, ok)
}

/// Applies the built-in rules for a non-file field.
///
/// Only checkbox groups take a collection. Any other field given a
/// one-entry collection is checked against that entry; a longer
/// collection is rejected.
fn validate_value(field: &FieldDescriptor, value: Option<&FieldValue>) -> Result<(), FieldError> {
    let value = match value {
        Some(multiple @ FieldValue::Multiple(_)) if field.is_multi_valued() => {
            if field.is_required() && multiple.is_blank() {
                return Err(FieldError::MissingRequired);
            }
            return Ok(());
        }
        Some(FieldValue::Multiple(values)) => match values.as_slice() {
            [] => "",
            [only] => only.trim(),
            _ => return Err(FieldError::InvalidFormat),
        },
        Some(FieldValue::Single(value)) => value.trim(),
        None => "",
    };

    if field.is_required() {
        RequiredValidator.validate(value)?;
    }
    if value.is_empty() {
        return Ok(());
    }

    match field.kind {
        FieldKind::Email => EmailValidator.validate(value),
        FieldKind::Textarea => MinLengthValidator::new(TEXTAREA_MIN_LENGTH).validate(value),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldOptions;

    #[test]
    fn test_required_validator() {
        let v = RequiredValidator::new();
        assert!(v.validate("hello").is_ok());
        assert_eq!(v.validate(""), Err(FieldError::MissingRequired));
        assert!(v.validate("   ").is_err());
    }

    #[test]
    fn test_min_length_validator() {
        let v = MinLengthValidator::new(5);
        assert!(v.validate("hello").is_ok());
        assert!(v.validate("hello world").is_ok());
        assert_eq!(v.validate("hi"), Err(FieldError::TooShort { min: 5 }));
        assert!(v.validate("héllo").is_ok());
    }

    #[test]
    fn test_email_validator() {
        let v = EmailValidator::new();
        assert!(v.validate("a@b.com").is_ok());
        assert!(v.validate("user.name@domain.co.uk").is_ok());
        assert_eq!(v.validate("not-an-email"), Err(FieldError::InvalidFormat));
        assert!(v.validate("@example.com").is_err());
    }

    #[test]
    fn test_value_rules() {
        let textarea = FieldDescriptor::new("message", "textarea", "Message");
        let nine = FieldValue::from("123456789");
        let ten = FieldValue::from("1234567890");
        assert_eq!(
            validate_value(&textarea, Some(&nine)),
            Err(FieldError::TooShort { min: 10 })
        );
        assert!(validate_value(&textarea, Some(&ten)).is_ok());
        assert!(validate_value(&textarea, None).is_ok());

        let padded = FieldValue::from("  1234567890  ");
        assert!(validate_value(&textarea, Some(&padded)).is_ok());
    }

    #[test]
    fn test_required_stops_further_rules() {
        let email = FieldDescriptor::new("email", "email", "Email").required();
        assert_eq!(
            validate_value(&email, Some(&FieldValue::from("   "))),
            Err(FieldError::MissingRequired)
        );
    }

    #[test]
    fn test_unknown_kind_has_no_rule() {
        let field = FieldDescriptor::new("color", "color", "Color");
        assert!(validate_value(&field, Some(&FieldValue::from("x"))).is_ok());
    }

    #[test]
    fn test_required_checkbox_group() {
        let field = FieldDescriptor::new("tags", "checkbox", "Tags")
            .required()
            .options(FieldOptions::list(["a", "b"]));
        assert!(validate_value(&field, Some(&FieldValue::from(vec!["a"]))).is_ok());
        assert_eq!(
            validate_value(&field, Some(&FieldValue::from(vec![" "]))),
            Err(FieldError::MissingRequired)
        );
    }

    #[test]
    fn test_collection_on_scalar_field_gets_the_scalar_rules() {
        let email = FieldDescriptor::new("email", "email", "Email").required();
        assert_eq!(
            validate_value(&email, Some(&FieldValue::from(vec!["not-an-email"]))),
            Err(FieldError::InvalidFormat)
        );
        assert!(validate_value(&email, Some(&FieldValue::from(vec!["a@b.com"]))).is_ok());
        assert_eq!(
            validate_value(&email, Some(&FieldValue::from(Vec::<String>::new()))),
            Err(FieldError::MissingRequired)
        );

        let message = FieldDescriptor::new("msg", "textarea", "Message");
        assert_eq!(
            validate_value(&message, Some(&FieldValue::from(vec!["short"]))),
            Err(FieldError::TooShort { min: 10 })
        );
        assert_eq!(
            validate_value(&message, Some(&FieldValue::from(vec!["long enough", "twice"]))),
            Err(FieldError::InvalidFormat)
        );

        let single = FieldDescriptor::new("agree", "checkbox", "Agree");
        assert_eq!(
            validate_value(&single, Some(&FieldValue::from(vec!["1", "1"]))),
            Err(FieldError::InvalidFormat)
        );
    }
}
