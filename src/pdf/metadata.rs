//! Readback of generated documents

use std::path::Path;

use lopdf::{Document, Object};

use crate::error::{Error, Result};

/// What `info` reports about an existing PDF
#[derive(Debug, Clone)]
pub struct PdfSummary {
    /// Number of pages, from the page tree's Count field
    pub page_count: usize,
    /// Document title, if the Info dictionary carries one
    pub title: Option<String>,
    /// Document author, if the Info dictionary carries one
    pub author: Option<String>,
}

/// Load a PDF and report its page count and Info strings
///
/// Meant as a pre-print sanity check on generated sheets, but works on any
/// well-formed PDF.
pub fn summarize(path: &Path) -> Result<PdfSummary> {
    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;

    Ok(PdfSummary {
        page_count,
        title: info_string(&doc, b"Title"),
        author: info_string(&doc, b"Author"),
    })
}

/// Count pages via the Pages dictionary Count field
///
/// More reliable than walking Kids, which would need nested page tree
/// handling.
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("Document has no catalog".to_string()))?;

    let pages_id = doc
        .get_object(catalog_id)?
        .as_dict()
        .and_then(|dict| dict.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("Catalog has no page tree".to_string()))?;

    let count = doc
        .get_object(pages_id)?
        .as_dict()
        .and_then(|dict| dict.get(b"Count"))
        .and_then(Object::as_i64)
        .map_err(|_| Error::General("Page tree has no Count".to_string()))?;

    Ok(count as usize)
}

/// Read one string entry from the Info dictionary, if present and UTF-8
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").and_then(Object::as_reference).ok()?;
    let info = doc.get_object(info_id).ok()?.as_dict().ok()?;
    let bytes = info.get(key).and_then(Object::as_str).ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}
