mod loader;
mod validate;

pub use loader::{
    LoadError, json_files_in, load_directory, load_document, parse_document_str, read_document,
};
pub use validate::{Severity, ValidationIssue, validate_document, validate_exam, validate_section};
