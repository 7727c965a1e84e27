//! Test fixture PDF creation using lopdf
//!
//! Two writers are available, chosen up front through [`WriterKind`]:
//! one renders a title, page line and body text on every page, the other
//! produces blank pages.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;
use crate::error::{Error, Result};

/// US Letter width in points
pub const LETTER_WIDTH: f32 = 612.0;
/// US Letter height in points
pub const LETTER_HEIGHT: f32 = 792.0;

const BODY_LEFT: f32 = 100.0;
const BODY_LINE_SPACING: f32 = 20.0;

/// One fixture document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSpec {
    pub file_name: String,
    pub pages: usize,
    pub title: String,
}

impl FixtureSpec {
    pub fn new(file_name: impl Into<String>, pages: usize, title: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            pages,
            title: title.into(),
        }
    }
}

/// The fixture set used by the merge tool's tests
pub fn default_fixtures() -> Vec<FixtureSpec> {
    vec![
        FixtureSpec::new("document_a.pdf", 10, "Document A - Test File"),
        FixtureSpec::new("document_b.pdf", 10, "Document B - Test File"),
        FixtureSpec::new("document_c.pdf", 5, "Document C - Test File"),
        FixtureSpec::new("small_doc.pdf", 3, "Small Document"),
        FixtureSpec::new("single_page.pdf", 1, "Single Page"),
    ]
}

/// Something that can write a fixture document to disk
pub trait DocumentWriter {
    /// Write `spec` to `path`, replacing any existing file
    fn write(&self, path: &Path, spec: &FixtureSpec) -> Result<()>;

    /// Describe a document of `pages` pages, e.g. "3 pages with text"
    fn describe(&self, pages: usize) -> String;
}

/// Which writer to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriterKind {
    /// Title, page number and body text on every page
    #[default]
    RichText,
    /// Empty pages
    BlankPages,
}

impl WriterKind {
    pub fn writer(self) -> Box<dyn DocumentWriter> {
        match self {
            WriterKind::RichText => Box::new(RichTextWriter),
            WriterKind::BlankPages => Box::new(BlankPageWriter),
        }
    }
}

/// Writes pages with rendered Helvetica text
#[derive(Debug, Clone, Copy, Default)]
pub struct RichTextWriter;

impl DocumentWriter for RichTextWriter {
    fn write(&self, path: &Path, spec: &FixtureSpec) -> Result<()> {
        let mut doc = Document::with_version("1.5");

        let regular_id = add_standard_font(&mut doc, "Helvetica");
        let bold_id = add_standard_font(&mut doc, "Helvetica-Bold");

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(regular_id));
        fonts.set("F2", Object::Reference(bold_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        let resources_id = doc.add_object(Object::Dictionary(resources));

        let contents: Vec<String> = (1..=spec.pages)
            .map(|page_num| page_text_content(page_num, spec.pages, &spec.title))
            .collect();

        build_document(&mut doc, contents, Some(resources_id))?;

        let mut info = Dictionary::new();
        info.set("Title", Object::String(spec.title.as_bytes().to_vec(), StringFormat::Literal));
        info.set("Producer", Object::String(b"pdf-mergician-tools".to_vec(), StringFormat::Literal));
        let info_id = doc.add_object(Object::Dictionary(info));
        doc.trailer.set("Info", Object::Reference(info_id));

        save(&mut doc, path)
    }

    fn describe(&self, pages: usize) -> String {
        format!("{} {} with text", pages, plural_pages(pages))
    }
}

/// Writes empty pages
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankPageWriter;

impl DocumentWriter for BlankPageWriter {
    fn write(&self, path: &Path, spec: &FixtureSpec) -> Result<()> {
        let mut doc = Document::with_version("1.5");
        build_document(&mut doc, vec![String::new(); spec.pages], None)?;
        save(&mut doc, path)
    }

    fn describe(&self, pages: usize) -> String {
        format!("{} blank {}", pages, plural_pages(pages))
    }
}

/// Write every fixture in `specs` into `dir`, creating it if needed
///
/// Returns the written paths in the same order as `specs`.
pub fn generate_fixtures(
    dir: &Path,
    specs: &[FixtureSpec],
    writer: &dyn DocumentWriter,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    specs
        .iter()
        .map(|spec| {
            let path = dir.join(&spec.file_name);
            writer.write(&path, spec)?;
            debug!(path = %path.display(), pages = spec.pages, "wrote fixture");
            Ok(path)
        })
        .collect()
}

fn plural_pages(pages: usize) -> &'static str {
    if pages == 1 {
        "page"
    } else {
        "pages"
    }
}

/// Register one of the 14 standard PDF fonts
fn add_standard_font(doc: &mut Document, base_font: &str) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(base_font.as_bytes().to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    doc.add_object(Object::Dictionary(font))
}

/// Assemble the page tree: one page per content string, all US Letter
fn build_document(
    doc: &mut Document,
    page_contents: Vec<String>,
    resources_id: Option<ObjectId>,
) -> Result<()> {
    if page_contents.is_empty() {
        return Err(Error::General("A fixture needs at least one page".to_string()));
    }

    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(page_contents.len());
    for content in page_contents {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set("Contents", Object::Reference(content_id));
        kids.push(Object::Reference(doc.add_object(Object::Dictionary(page))));
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(kids.len() as i64));
    pages.set("Kids", Object::Array(kids));
    pages.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(LETTER_WIDTH),
            Object::Real(LETTER_HEIGHT),
        ]),
    );
    if let Some(id) = resources_id {
        pages.set("Resources", Object::Reference(id));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok(())
}

fn save(doc: &mut Document, path: &Path) -> Result<()> {
    doc.compress();
    doc.save(path)?;
    Ok(())
}

/// Content stream for one page of a text fixture
fn page_text_content(page_num: usize, total_pages: usize, title: &str) -> String {
    let mut content = String::new();
    content.push_str("0 g\n");

    let title_size = 24.0;
    content.push_str(&centered_text("F2", title_size, LETTER_HEIGHT - 100.0, title));

    let page_line = format!("Page {} of {}", page_num, total_pages);
    content.push_str(&centered_text("F1", 16.0, LETTER_HEIGHT - 150.0, &page_line));

    let lines = body_lines(page_num, total_pages, title);
    let mut y = LETTER_HEIGHT - 200.0;
    for line in &lines {
        if !line.is_empty() {
            content.push_str("BT\n");
            content.push_str("/F1 12 Tf\n");
            content.push_str(&format!("1 0 0 1 {} {} Tm\n", BODY_LEFT, y));
            content.push_str(&format!("({}) Tj\n", escape_pdf_string(line)));
            content.push_str("ET\n");
        }
        y -= BODY_LINE_SPACING;
    }

    content
}

fn body_lines(page_num: usize, total_pages: usize, title: &str) -> Vec<String> {
    vec![
        format!("This is page {} of the {} document.", page_num, title),
        String::new(),
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit.".to_string(),
        "Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.".to_string(),
        "Ut enim ad minim veniam, quis nostrud exercitation ullamco.".to_string(),
        String::new(),
        format!("Document: {}", title),
        format!("Page: {}/{}", page_num, total_pages),
    ]
}

fn centered_text(font: &str, size: f32, y: f32, text: &str) -> String {
    let x = (LETTER_WIDTH - estimate_text_width(text, size)) / 2.0;
    format!(
        "BT\n/{} {} Tf\n1 0 0 1 {} {} Tm\n({}) Tj\nET\n",
        font,
        size,
        x.max(0.0),
        y,
        escape_pdf_string(text)
    )
}

/// Escape special characters in PDF strings
fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}

/// Rough Helvetica width: about half an em per character
fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}
