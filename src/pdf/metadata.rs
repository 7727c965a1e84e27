//! PDF metadata extraction for generated fixtures

use std::path::Path;
use lopdf::{Dictionary, Document, Object};
use crate::error::{Error, Result};

/// Read the Count field of the page tree root
///
/// This reports what the document declares, which is what a merge tool sees
/// first; it does not walk nested page trees.
fn declared_page_count(doc: &Document) -> Result<usize> {
    let pages_id = doc.catalog()?.get(b"Pages")?.as_reference()?;
    let count = doc.get_dictionary(pages_id)?.get(b"Count")?.as_i64()?;

    usize::try_from(count)
        .map_err(|_| Error::General(format!("Negative page count: {}", count)))
}

/// Read a text entry from the Info dictionary
fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    let bytes = info.get(key).ok()?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

fn load(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(Document::load(path)?)
}

fn non_empty_page_count(doc: &Document, path: &Path) -> Result<usize> {
    match declared_page_count(doc)? {
        0 => Err(Error::EmptyPdf(path.to_path_buf())),
        n => Ok(n),
    }
}

/// Extract page count, title and author from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    let doc = load(path)?;
    let page_count = non_empty_page_count(&doc, path)?;

    let info = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .ok();

    Ok(PdfMetadata {
        page_count,
        title: info.and_then(|d| info_string(d, b"Title")),
        author: info.and_then(|d| info_string(d, b"Author")),
    })
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    let doc = load(path)?;
    non_empty_page_count(&doc, path)
}
