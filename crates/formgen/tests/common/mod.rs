#![allow(dead_code)]

use std::fs;
use std::path::Path;

use formgen::fields::{email_field, file_field, select_field, text_field, textarea_field};
use formgen::{FormData, FormMethod, FormSchema, Submission, UploadedFile};

/// The contact form used across the integration tests.
pub fn contact_schema() -> FormSchema {
    FormSchema::with_method("/contact", FormMethod::Post)
        .field(text_field("name", "Name", true).attr("class", "input-text").id("name-field"))
        .field(email_field("email", "Email", true).id("email-field"))
        .field(textarea_field("message", "Message", true))
        .field(select_field(
            "subject",
            "Subject",
            vec!["billing", "support", "other"],
            true,
        ))
        .field(file_field("attachment", "Attachment", false))
}

pub fn body(query: &str) -> Submission {
    Submission::post(
        FormData::parse_urlencoded(query)
            .unwrap_or_else(|e| panic!("Failed to parse: {query}\nError: {e:?}")),
    )
}

/// Writes `size` bytes into `dir/tmp_name` and returns upload metadata for it.
pub fn upload(dir: &Path, tmp_name: &str, file_name: &str, size: usize) -> UploadedFile {
    let path = dir.join(tmp_name);
    fs::write(&path, vec![b'x'; size])
        .unwrap_or_else(|e| panic!("Failed to write {}: {e}", path.display()));
    UploadedFile::new(path, file_name, size as u64)
}
