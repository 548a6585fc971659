//! Form widgets for rendering HTML controls.
//!
//! Every string placed in markup goes through [`html_escape`]; attribute
//! names additionally go through [`sanitize_attr_name`].

mod controls;

use std::sync::LazyLock;

use regex::Regex;

pub use controls::{
    checkbox_group, file_input, radio_group, select, single_checkbox, text_input, textarea,
};

use crate::schema::{AttrValue, FieldDescriptor, FieldKind, RenderAttributes};
use crate::submission::FieldValue;

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("valid numeric regex")
});

/// Attribute keys that are never copied into the attribute string.
///
/// `options` is reserved for choice lists and `id` is emitted separately.
const RESERVED_ATTRS: &[&str] = &["options", "id"];

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Reduces an attribute name to characters valid in an HTML attribute name.
pub fn sanitize_attr_name(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect()
}

/// Renders attributes as an HTML attribute string with a leading space per entry.
///
/// `true` flags render bare, `false` flags render nothing, anything else
/// renders as `key="value"`.
pub fn render_attrs(attrs: &RenderAttributes) -> String {
    let mut out = String::new();
    for (key, value) in attrs.iter() {
        if RESERVED_ATTRS.contains(&key) {
            continue;
        }
        let key = sanitize_attr_name(key);
        if key.is_empty() {
            continue;
        }
        match value {
            AttrValue::Flag(true) => {
                out.push(' ');
                out.push_str(&key);
            }
            AttrValue::Flag(false) => {}
            other => {
                out.push_str(&format!(r#" {key}="{}""#, html_escape(&other.to_string())));
            }
        }
    }
    out
}

/// Compares a submitted value with an option value.
///
/// Equal strings match, and so do two decimal strings of equal value
/// (`"1"` and `"01"`). Words such as `inf` or `NaN` only match themselves.
pub fn loose_eq(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    if !NUMERIC_RE.is_match(a) || !NUMERIC_RE.is_match(b) {
        return false;
    }
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

/// Renders the control for a field.
///
/// `value` is the sticky value; it is ignored for file inputs. Unknown
/// kinds render as text inputs.
pub fn render_control(field: &FieldDescriptor, value: Option<&FieldValue>) -> String {
    let id = field.element_id();
    let attrs = render_attrs(&field.attributes);
    let scalar = value.and_then(FieldValue::as_single).unwrap_or("");
    let options = field.options.as_ref().map(|o| o.pairs()).unwrap_or_default();

    match &field.kind {
        FieldKind::Text | FieldKind::Other(_) => {
            text_input("text", &field.name, &id, scalar, &attrs)
        }
        FieldKind::Email => text_input("email", &field.name, &id, scalar, &attrs),
        FieldKind::File => file_input(&field.name, &id, &attrs),
        FieldKind::Textarea => textarea(&field.name, &id, scalar, &attrs),
        FieldKind::Select => select(&field.name, &id, &options, scalar, &attrs),
        FieldKind::Radio => radio_group(&field.name, &id, &options, scalar, &attrs),
        FieldKind::Checkbox if field.is_multi_valued() => {
            let selected = value.map(FieldValue::as_list).unwrap_or_default();
            checkbox_group(&field.name, &id, &options, &selected, &attrs)
        }
        FieldKind::Checkbox => {
            let checked = value.is_some_and(FieldValue::is_truthy);
            single_checkbox(&field.name, &id, checked, &attrs)
        }
    }
}
