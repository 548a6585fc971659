//! File upload field type.

use crate::schema::{FieldDescriptor, FieldKind};

/// Creates a file upload field.
pub fn file_field(name: &str, label: &str, required: bool) -> FieldDescriptor {
    let field = FieldDescriptor::new(name, FieldKind::File, label);

    if required {
        field.required()
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_field() {
        let field = file_field("cv", "Curriculum", true);
        assert_eq!(field.kind, FieldKind::File);
        assert!(field.is_required());
    }
}
