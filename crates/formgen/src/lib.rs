//! # formgen
//!
//! Declarative forms: one ordered field schema drives HTML rendering,
//! validation and file-upload handling.
//!
//! This crate provides:
//! - A schema of field descriptors with form-level action and method
//! - Rendering with sticky values and inline errors
//! - A validation pass yielding at most one error per field
//! - File upload checks (size, extension) and persistence
//!
//! ## Quick Start
//!
//! ```rust
//! use formgen::{FormData, FormSchema, LocalUploadStore, Submission};
//! use formgen::fields::{email_field, text_field, textarea_field};
//!
//! let schema = FormSchema::new("/contact", "post")
//!     .unwrap()
//!     .field(text_field("name", "Name", true))
//!     .field(email_field("email", "Email", true))
//!     .field(textarea_field("message", "Message", false));
//!
//! let body = FormData::parse_urlencoded("name=Ada&email=not-an-email").unwrap();
//! let submission = Submission::post(body);
//! let store = LocalUploadStore::new("uploads");
//!
//! let (ok, errors) = schema.handle_submission(&submission, &store);
//! assert!(!ok);
//! assert!(errors.contains("email"));
//!
//! // Re-render with inline errors and sticky values.
//! let html = schema.render(&submission, &errors);
//! assert!(html.contains("Enter a valid email address."));
//! ```
//!
//! ## Choice Fields
//!
//! ```rust
//! use formgen::{FieldDescriptor, FieldOptions, FormMethod, FormSchema};
//! use formgen::fields::{checkbox_group_field, select_field};
//!
//! let schema = FormSchema::with_method("/survey", FormMethod::Get)
//!     .field(select_field("topic", "Topic", vec!["billing", "support"], true))
//!     .field(checkbox_group_field("tags", "Tags", vec![("a", "Alpha"), ("b", "Beta")], false))
//!     .field(
//!         FieldDescriptor::new("size", "radio", "Size")
//!             .options(FieldOptions::choices([("s", "Small"), ("l", "Large")])),
//!     );
//! assert_eq!(schema.fields().len(), 3);
//! ```
//!
//! ## File Uploads
//!
//! File fields are checked by [`upload::handle_upload`] against an
//! [`UploadPolicy`] (2 MiB, `.jpeg`/`.png`/`.pdf` by default) and written by
//! an [`UploadStore`] such as [`LocalUploadStore`].

mod error;
pub mod fields;
mod form;
mod schema;
mod submission;
pub mod upload;
pub mod validation;
pub mod widgets;

pub use error::{FieldError, FormError, Result, ValidationErrors};
pub use form::{render_field, render_form};
pub use schema::{
    AttrValue, FieldDescriptor, FieldKind, FieldOptions, FormMethod, FormSchema, RenderAttributes,
};
pub use submission::{FieldValue, FormData, Submission, UploadedFile, UploadedFiles};
pub use upload::{LocalUploadStore, TransferMode, UploadPolicy, UploadState, UploadStore};
pub use validation::validate;
