//! Inspection of rendered PDFs

use std::path::Path;
use lopdf::{Document, Object};
use crate::error::{Error, Result};

/// Read the page count from the root Pages node
///
/// More reliable than `get_pages()`, which does not handle every nested
/// page tree layout.
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let pages_id = doc.catalog()?.get(b"Pages")?.as_reference()?;
    let count = doc.get_dictionary(pages_id)?.get(b"Count")?.as_i64()?;

    usize::try_from(count).map_err(|_| Error::General(format!("Invalid page count: {}", count)))
}

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
    /// Producing application (if present), e.g. the rendering engine
    pub producer: Option<String>,
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::General(format!("PDF not found: {}", path.display())));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;

    let info = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .ok();

    let text_field = |key: &[u8]| {
        info.and_then(|dict| dict.get(key).ok())
            .and_then(|obj| obj.as_str().ok())
            .map(decode_text_string)
    };

    Ok(PdfMetadata {
        page_count,
        title: text_field(b"Title"),
        producer: text_field(b"Producer"),
    })
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    let doc = Document::load(path)?;
    count_pages_from_catalog(&doc)
}

/// Decode a PDF text string: UTF-16BE with a byte order mark, otherwise
/// treated as (lossy) UTF-8
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_pages_nonexistent_file() {
        assert!(count_pages(Path::new("nonexistent.pdf")).is_err());
    }

    #[test]
    fn test_extract_metadata_nonexistent_file() {
        let result = extract_metadata(Path::new("nonexistent.pdf"));
        assert!(matches!(result.unwrap_err(), Error::General(_)));
    }

    #[test]
    fn test_decode_text_string() {
        assert_eq!(decode_text_string(b"WeasyPrint 62.3"), "WeasyPrint 62.3");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0xED]), "Hí");
    }

    // Rendered-document tests live in tests/integration.rs
}
