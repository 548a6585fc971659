//! Field descriptor helpers for each kind.

mod checkbox;
mod file;
mod select;
mod text;

pub use checkbox::{checkbox_field, checkbox_group_field};
pub use file::file_field;
pub use select::{radio_field, select_field};
pub use text::{email_field, text_field, textarea_field};
