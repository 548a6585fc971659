//! Field descriptors and the form schema they belong to.

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;
use std::str::FromStr;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::{FormError, Result, ValidationErrors};
use crate::submission::Submission;
use crate::upload::UploadStore;

/// The kind of control a field renders as.
///
/// Unrecognised kind tags are kept as [`FieldKind::Other`]: they render
/// like [`FieldKind::Text`] and carry no kind-specific validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum FieldKind {
    /// Single-line text input.
    #[default]
    Text,
    /// Email input, validated for address syntax.
    Email,
    /// Multi-line text, validated for a minimum length.
    Textarea,
    /// Dropdown select.
    Select,
    /// Radio button group.
    Radio,
    /// Single checkbox, or a checkbox group when options are present.
    Checkbox,
    /// File upload.
    File,
    /// Any other tag; rendered as a text input.
    Other(String),
}

impl FieldKind {
    /// Parses a kind tag, case-insensitively.
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "email" => Self::Email,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "file" => Self::File,
            _ => Self::Other(tag.to_string()),
        }
    }

    /// Returns the kind tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::File => "file",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for FieldKind {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

impl From<String> for FieldKind {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The value of a single HTML attribute.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Presence flag: `true` renders the bare key, `false` renders nothing.
    Flag(bool),
    /// Rendered as `key="value"`.
    Text(String),
    /// Rendered as `key="value"`.
    Number(serde_json::Number),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for AttrValue {
    fn from(number: i64) -> Self {
        Self::Number(number.into())
    }
}

impl From<u64> for AttrValue {
    fn from(number: u64) -> Self {
        Self::Number(number.into())
    }
}

/// Insertion-ordered HTML attributes of a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderAttributes {
    attrs: Vec<(String, AttrValue)>,
}

impl RenderAttributes {
    /// Creates new empty attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    /// Builder method to set an attribute.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Gets an attribute.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns whether `key` is set to the flag `true`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(AttrValue::Flag(true)))
    }

    /// Iterates attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns whether no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// Options of a choice field (select, radio, checkbox group).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawOptions")]
pub enum FieldOptions {
    /// Flat sequence; each value doubles as its label.
    List(Vec<String>),
    /// Ordered `(value, label)` pairs.
    Choices(Vec<(String, String)>),
}

impl FieldOptions {
    /// Creates a flat option list.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Creates value/label choices.
    pub fn choices<I, V, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        Self::Choices(
            pairs
                .into_iter()
                .map(|(v, l)| (v.into(), l.into()))
                .collect(),
        )
    }

    /// Iterates `(value, label)` pairs regardless of form.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        match self {
            Self::List(values) => values.iter().map(|v| (v.as_str(), v.as_str())).collect(),
            Self::Choices(pairs) => pairs
                .iter()
                .map(|(v, l)| (v.as_str(), l.as_str()))
                .collect(),
        }
    }

    /// Returns the number of options.
    pub fn len(&self) -> usize {
        match self {
            Self::List(values) => values.len(),
            Self::Choices(pairs) => pairs.len(),
        }
    }

    /// Returns whether there are no options.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOptions {
    List(Vec<String>),
    Choices(OrderedPairs<String>),
}

impl From<RawOptions> for FieldOptions {
    fn from(raw: RawOptions) -> Self {
        match raw {
            RawOptions::List(values) => Self::List(values),
            RawOptions::Choices(pairs) => Self::Choices(pairs.0),
        }
    }
}

/// A JSON object read as key/value pairs in document order.
struct OrderedPairs<V>(Vec<(String, V)>);

impl<V> Default for OrderedPairs<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedPairs<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PairsVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
            type Value = OrderedPairs<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    pairs.push((key, value));
                }
                Ok(OrderedPairs(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor(PhantomData))
    }
}

/// Declarative description of one form control.
///
/// When loaded from JSON, options may also be given as an `options` entry
/// of `attributes`; a top-level `options` key takes precedence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawField")]
pub struct FieldDescriptor {
    /// Field name; also the submitted-data key.
    pub name: String,
    /// Control kind.
    pub kind: FieldKind,
    /// Label text.
    pub label: String,
    /// HTML attributes.
    pub attributes: RenderAttributes,
    /// Options for choice kinds.
    pub options: Option<FieldOptions>,
}

#[derive(Deserialize)]
struct RawField {
    name: String,
    #[serde(default, alias = "type")]
    kind: FieldKind,
    #[serde(default)]
    label: String,
    #[serde(default)]
    attributes: OrderedPairs<RawAttr>,
    #[serde(default)]
    options: Option<FieldOptions>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttr {
    Value(AttrValue),
    Options(FieldOptions),
}

impl TryFrom<RawField> for FieldDescriptor {
    type Error = String;

    fn try_from(raw: RawField) -> std::result::Result<Self, Self::Error> {
        let mut field = Self::new(raw.name, raw.kind, raw.label);
        let mut nested = None;
        for (key, value) in raw.attributes.0 {
            match (key.as_str(), value) {
                ("options", RawAttr::Options(options)) => nested = Some(options),
                (_, RawAttr::Value(value)) => field.attributes.set(key, value),
                (_, RawAttr::Options(_)) => {
                    return Err(format!(
                        "attribute {key:?} of field {:?} must be a scalar",
                        field.name
                    ))
                }
            }
        }
        field.options = raw.options.or(nested);
        Ok(field)
    }
}

impl FieldDescriptor {
    /// Creates a new field descriptor.
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<FieldKind>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            label: label.into(),
            attributes: RenderAttributes::new(),
            options: None,
        }
    }

    /// Sets an HTML attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Replaces all attributes.
    #[must_use]
    pub fn attributes(mut self, attributes: RenderAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Marks the field required.
    #[must_use]
    pub fn required(self) -> Self {
        self.attr("required", true)
    }

    /// Disables the field.
    #[must_use]
    pub fn disabled(self) -> Self {
        self.attr("disabled", true)
    }

    /// Sets the element identifier.
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id.into())
    }

    /// Sets the choice options.
    #[must_use]
    pub fn options(mut self, options: FieldOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the choice options on an existing descriptor.
    pub fn set_options(&mut self, options: FieldOptions) -> &mut Self {
        self.options = Some(options);
        self
    }

    /// Returns the element identifier: the `id` attribute, else the name.
    pub fn element_id(&self) -> String {
        match self.attributes.get("id") {
            Some(AttrValue::Flag(_)) | None => self.name.clone(),
            Some(id) => id.to_string(),
        }
    }

    /// Returns whether the field submits a `name[]` collection.
    pub fn is_multi_valued(&self) -> bool {
        self.kind == FieldKind::Checkbox && self.options.is_some()
    }

    /// Returns whether the field is required.
    pub fn is_required(&self) -> bool {
        self.attributes.flag("required")
    }

    /// Returns whether the field is disabled.
    pub fn is_disabled(&self) -> bool {
        self.attributes.flag("disabled")
    }
}

/// Form submission method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum FormMethod {
    /// GET method
    Get,
    /// POST method
    #[default]
    Post,
}

impl FormMethod {
    /// Returns the method as an upper-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl FromStr for FormMethod {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(FormError::InvalidMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for FormMethod {
    type Error = FormError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Ordered field descriptors plus form-level action and method.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    action: String,
    #[serde(default)]
    method: FormMethod,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    /// Creates an empty schema; `method` is parsed case-insensitively.
    pub fn new(action: impl Into<String>, method: &str) -> Result<Self> {
        Ok(Self::with_method(action, method.parse()?))
    }

    /// Creates an empty schema with an already-parsed method.
    pub fn with_method(action: impl Into<String>, method: FormMethod) -> Self {
        Self {
            action: action.into(),
            method,
            fields: Vec::new(),
        }
    }

    /// Parses a schema from its JSON definition.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a schema definition file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Returns the submission target.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Sets the submission target.
    pub fn set_action(&mut self, action: impl Into<String>) {
        self.action = action.into();
    }

    /// Returns the submission method.
    pub fn method(&self) -> FormMethod {
        self.method
    }

    /// Sets the submission method from a case-insensitive string.
    pub fn set_method(&mut self, method: &str) -> Result<()> {
        self.method = method.parse()?;
        Ok(())
    }

    /// Appends a field and returns it for further configuration.
    ///
    /// Duplicate names are accepted as given.
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<FieldKind>,
        label: impl Into<String>,
        attributes: RenderAttributes,
    ) -> &mut FieldDescriptor {
        self.push(FieldDescriptor::new(name, kind, label).attributes(attributes));
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    /// Appends a prepared field descriptor.
    pub fn push(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    /// Builder method to append a field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.push(field);
        self
    }

    /// Returns the fields in render order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns whether any field is a file upload.
    pub fn has_file_field(&self) -> bool {
        self.fields.iter().any(|f| f.kind == FieldKind::File)
    }

    /// Renders the form with sticky values and inline errors.
    pub fn render(&self, submission: &Submission, errors: &ValidationErrors) -> String {
        crate::form::render_form(self, submission, errors)
    }

    /// Validates a submission; returns the verdict and the error map.
    pub fn handle_submission(
        &self,
        submission: &Submission,
        store: &dyn UploadStore,
    ) -> (bool, ValidationErrors) {
        let (errors, ok) = crate::validation::validate(self, submission, store);
        (ok, errors)
    }
}
