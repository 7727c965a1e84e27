//! PDF fixture generation and inspection

pub mod create;
pub mod metadata;

// Re-export commonly used items
pub use create::{
    default_fixtures, generate_fixtures, BlankPageWriter, DocumentWriter, FixtureSpec,
    RichTextWriter, WriterKind,
};
pub use metadata::{count_pages, extract_metadata, PdfMetadata};
