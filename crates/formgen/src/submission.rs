//! Submitted form data and uploaded-file metadata.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{FormError, Result};
use crate::schema::FormMethod;

/// Suffix marking a key whose values are collected into a list.
const ARRAY_MARKER: &str = "[]";

/// A submitted value: a scalar, or a collection from a `name[]` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Single value.
    Single(String),
    /// Multiple values submitted under `name[]`.
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Returns the scalar value, if this is not a collection.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// Returns the values as a collection; a scalar becomes a one-element list.
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Returns whether the value is truthy: non-empty and not `"0"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Single(value) => !value.is_empty() && value != "0",
            Self::Multiple(values) => !values.is_empty(),
        }
    }

    /// Returns whether nothing but whitespace was submitted.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Single(value) => value.trim().is_empty(),
            Self::Multiple(values) => values.iter().all(|v| v.trim().is_empty()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multiple(values.into_iter().map(String::from).collect())
    }
}

/// Submitted key/value data for one channel (query string or body).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: HashMap<String, FieldValue>,
}

impl FormData {
    /// Creates new empty form data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder method to insert a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Gets a value.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// Returns whether no value was submitted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses an `application/x-www-form-urlencoded` string.
    ///
    /// Keys ending in `[]` collect their values in order; a repeated plain
    /// key keeps its last value.
    pub fn parse_urlencoded(input: &str) -> Result<Self> {
        let mut data = Self::new();
        for pair in input.split('&').filter(|p| !p.is_empty()) {
            let mut parts = pair.splitn(2, '=');
            let key = decode(parts.next().unwrap_or(""))?;
            let value = decode(parts.next().unwrap_or(""))?;

            match key.strip_suffix(ARRAY_MARKER) {
                Some(name) => match data.values.get_mut(name) {
                    Some(FieldValue::Multiple(values)) => values.push(value),
                    _ => data.insert(name, FieldValue::Multiple(vec![value])),
                },
                None => data.insert(key, value),
            }
        }
        Ok(data)
    }
}

fn decode(component: &str) -> Result<String> {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| FormError::InvalidFormData(format!("{component}: {e}")))
}

/// Metadata of one uploaded file, as supplied by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Transient location of the uploaded bytes.
    pub tmp_path: PathBuf,
    /// File name as chosen by the client.
    pub file_name: String,
    /// Declared size in bytes.
    pub size: u64,
    /// Whether a file was actually uploaded for this entry.
    pub uploaded: bool,
}

impl UploadedFile {
    /// Creates metadata for a genuine upload.
    pub fn new(tmp_path: impl Into<PathBuf>, file_name: impl Into<String>, size: u64) -> Self {
        Self {
            tmp_path: tmp_path.into(),
            file_name: file_name.into(),
            size,
            uploaded: true,
        }
    }

    /// Creates metadata for an entry where no file was chosen.
    pub fn empty() -> Self {
        Self {
            tmp_path: PathBuf::new(),
            file_name: String::new(),
            size: 0,
            uploaded: false,
        }
    }

    /// Returns the lower-cased extension, from the last `.` of the file name.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rfind('.')
            .map(|dot| self.file_name[dot..].to_lowercase())
    }
}

/// Uploaded files keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedFiles {
    files: HashMap<String, UploadedFile>,
}

impl UploadedFiles {
    /// Creates an empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts file metadata for a field.
    pub fn insert(&mut self, field: impl Into<String>, file: UploadedFile) {
        self.files.insert(field.into(), file);
    }

    /// Builder method to insert file metadata.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, file: UploadedFile) -> Self {
        self.insert(field, file);
        self
    }

    /// Gets the file metadata for a field.
    pub fn get(&self, field: &str) -> Option<&UploadedFile> {
        self.files.get(field)
    }
}

/// Everything one submission supplies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Query-string channel, read by GET forms.
    pub query: FormData,
    /// Body channel, read by POST forms.
    pub body: FormData,
    /// Uploaded files.
    pub files: UploadedFiles,
}

impl Submission {
    /// Creates an empty submission (nothing submitted yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a POST submission with the given body.
    pub fn post(body: FormData) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    /// Creates a GET submission with the given query.
    pub fn get(query: FormData) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    /// Attaches uploaded files.
    #[must_use]
    pub fn files(mut self, files: UploadedFiles) -> Self {
        self.files = files;
        self
    }

    /// Returns the data channel read by forms using `method`.
    pub fn data_for(&self, method: FormMethod) -> &FormData {
        match method {
            FormMethod::Get => &self.query,
            FormMethod::Post => &self.body,
        }
    }

    /// Returns the value submitted for `name` through `method`'s channel.
    pub fn value(&self, method: FormMethod, name: &str) -> Option<&FieldValue> {
        self.data_for(method).get(name)
    }
}
