//! Generated summary documents.

pub mod writer;

pub use writer::{render_document, requirements_warning, write_document};
