//! Error types for forms.

use std::collections::BTreeMap;
use thiserror::Error;

/// Form-specific errors.
///
/// These describe misuse of the API or faults while loading a schema or
/// submission. Validation failures are never reported through this type;
/// they are collected as [`FieldError`]s in [`ValidationErrors`].
#[derive(Debug, Error)]
pub enum FormError {
    /// The form method is neither GET nor POST.
    #[error("unsupported form method: {0}")]
    InvalidMethod(String),

    /// Schema definition could not be parsed.
    #[error("failed to parse schema: {0}")]
    Json(#[from] serde_json::Error),

    /// Submitted form data could not be decoded.
    #[error("failed to parse form data: {0}")]
    InvalidFormData(String),

    /// IO error while reading a schema or submitted file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single validation failure for one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A required field was submitted empty.
    #[error("This field is required.")]
    MissingRequired,

    /// An email field holds a malformed address.
    #[error("Enter a valid email address.")]
    InvalidFormat,

    /// A textarea holds fewer characters than allowed.
    #[error("Ensure this value has at least {min} characters.")]
    TooShort { min: usize },

    /// A required file field received no genuine upload.
    #[error("Please provide a file.")]
    FileMissing,

    /// The uploaded file is larger than the policy allows.
    #[error("File exceeds {}.", size_label(.max))]
    FileTooLarge { max: u64 },

    /// The uploaded file extension is not in the allowed set.
    #[error("File type not allowed. Only JPEG, PNG and PDF are accepted.")]
    FileTypeNotAllowed,

    /// Moving the upload to its destination failed.
    #[error("Upload failed.")]
    FileUploadFailed,
}

/// Collection of validation errors by field.
///
/// Holds at most one error per field: the first recorded error wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Errors keyed by field name.
    pub errors: BTreeMap<String, FieldError>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Records an error for a field unless one is already present.
    ///
    /// Returns `true` if the error was recorded.
    pub fn add(&mut self, field: &str, error: FieldError) -> bool {
        if self.errors.contains_key(field) {
            return false;
        }
        self.errors.insert(field.to_string(), error);
        true
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the error for a specific field.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    /// Returns whether a field has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Returns all errors as `(field, message)` pairs, ordered by field name.
    pub fn all_errors(&self) -> Vec<(&str, String)> {
        self.errors
            .iter()
            .map(|(field, error)| (field.as_str(), error.to_string()))
            .collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, error) in &self.errors {
            writeln!(f, "{field}: {error}")?;
        }
        Ok(())
    }
}

/// Human-readable byte count: whole MB or KB when exact, else bytes.
fn size_label(bytes: &u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    match *bytes {
        b if b >= MIB && b % MIB == 0 => format!("{} MB", b / MIB),
        b if b >= KIB && b % KIB == 0 => format!("{} KB", b / KIB),
        b => format!("{b} bytes"),
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_wins() {
        let mut errors = ValidationErrors::new();
        assert!(errors.add("email", FieldError::MissingRequired));
        assert!(!errors.add("email", FieldError::InvalidFormat));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some(&FieldError::MissingRequired));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            FieldError::TooShort { min: 10 }.to_string(),
            "Ensure this value has at least 10 characters."
        );
        assert_eq!(
            FieldError::FileTooLarge { max: 2_097_152 }.to_string(),
            "File exceeds 2 MB."
        );
    }

    #[test]
    fn test_size_message_below_one_megabyte() {
        assert_eq!(
            FieldError::FileTooLarge { max: 512 * 1024 }.to_string(),
            "File exceeds 512 KB."
        );
        assert_eq!(
            FieldError::FileTooLarge { max: 1_500_000 }.to_string(),
            "File exceeds 1500000 bytes."
        );
        assert_eq!(
            FieldError::FileTooLarge { max: 3 * 1024 * 1024 }.to_string(),
            "File exceeds 3 MB."
        );
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("name", FieldError::MissingRequired);
        errors.add("avatar", FieldError::FileTypeNotAllowed);
        let text = errors.to_string();
        assert!(text.starts_with("avatar: File type not allowed."));
        assert!(text.contains("name: This field is required."));
    }
}
