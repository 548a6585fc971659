//! Select and radio field types.

use crate::schema::{FieldDescriptor, FieldKind, FieldOptions};

/// Creates a select (dropdown) field; each option doubles as its label.
pub fn select_field(name: &str, label: &str, options: Vec<&str>, required: bool) -> FieldDescriptor {
    let field = FieldDescriptor::new(name, FieldKind::Select, label)
        .options(FieldOptions::list(options));

    if required {
        field.required()
    } else {
        field
    }
}

/// Creates a radio group from `(value, label)` choices.
pub fn radio_field(
    name: &str,
    label: &str,
    choices: Vec<(&str, &str)>,
    required: bool,
) -> FieldDescriptor {
    let field = FieldDescriptor::new(name, FieldKind::Radio, label)
        .options(FieldOptions::choices(choices));

    if required {
        field.required()
    } else {
        field
    }
}
