//! Checkbox field types.

use crate::schema::{FieldDescriptor, FieldKind, FieldOptions};

/// Creates a single checkbox submitting `1` when ticked.
pub fn checkbox_field(name: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldKind::Checkbox, label)
}

/// Creates a checkbox group submitting the ticked values as `name[]`.
pub fn checkbox_group_field(
    name: &str,
    label: &str,
    choices: Vec<(&str, &str)>,
    required: bool,
) -> FieldDescriptor {
    let field = FieldDescriptor::new(name, FieldKind::Checkbox, label)
        .options(FieldOptions::choices(choices));

    if required {
        field.required()
    } else {
        field
    }
}
