//! Text field types.

use crate::schema::{FieldDescriptor, FieldKind};

fn with_required(field: FieldDescriptor, required: bool) -> FieldDescriptor {
    if required {
        field.required()
    } else {
        field
    }
}

/// Creates a single-line text field.
pub fn text_field(name: &str, label: &str, required: bool) -> FieldDescriptor {
    with_required(FieldDescriptor::new(name, FieldKind::Text, label), required)
}

/// Creates an email field.
pub fn email_field(name: &str, label: &str, required: bool) -> FieldDescriptor {
    with_required(FieldDescriptor::new(name, FieldKind::Email, label), required)
}

/// Creates a textarea field.
pub fn textarea_field(name: &str, label: &str, required: bool) -> FieldDescriptor {
    with_required(
        FieldDescriptor::new(name, FieldKind::Textarea, label),
        required,
    )
}
