//! PDF merging functionality using lopdf
//!
//! Used when each HTML file is rendered on its own and the resulting PDFs
//! are stitched together in order.

use std::path::PathBuf;
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Upper bound when walking `Parent` links, in case a tree is cyclic
const MAX_TREE_DEPTH: usize = 64;

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order they should be merged
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// Merge several PDF files into one, keeping page order
///
/// Returns the number of pages written.
///
/// # Example
///
/// ```no_run
/// use html_pdf_merge::pdf::{MergeOptions, merge_pdfs};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     input_paths: vec![PathBuf::from("sesion1.pdf"), PathBuf::from("sesion2.pdf")],
///     output_path: PathBuf::from("plan.pdf"),
/// };
///
/// let pages = merge_pdfs(&options).expect("Failed to merge");
/// println!("{} pages", pages);
/// ```
pub fn merge_pdfs(options: &MergeOptions) -> Result<usize> {
    if options.input_paths.is_empty() {
        return Err(Error::General("No input files provided".to_string()));
    }

    let mut merged = Document::with_version("1.7");
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut next_id = 1;

    for path in &options.input_paths {
        let mut doc = Document::load(path)?;

        // Pages are re-parented below, so anything they inherit from the
        // old tree has to be copied onto them first.
        flatten_inherited_attributes(&mut doc)?;

        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        page_ids.extend(doc.get_pages().into_values());
        merged.objects.extend(doc.objects);
    }

    merged.max_id = next_id - 1;

    let pages_id = merged.new_object_id();
    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(page_ids.len() as i64));
    pages.set("Kids", Object::Array(kids));
    merged.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = merged.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    for &page_id in &page_ids {
        merged.get_dictionary_mut(page_id)?.set("Parent", Object::Reference(pages_id));
    }

    // Old catalogs and page tree nodes are unreachable now
    merged.prune_objects();
    merged.compress();
    merged.save(&options.output_path)?;

    tracing::debug!(
        "Merged {} PDF(s) into {} page(s) at {}",
        options.input_paths.len(),
        page_ids.len(),
        options.output_path.display()
    );

    Ok(page_ids.len())
}

/// Copy inheritable attributes from ancestor nodes onto every page that
/// does not set them itself
fn flatten_inherited_attributes(doc: &mut Document) -> Result<()> {
    for page_id in doc.get_pages().into_values() {
        let mut inherited: Vec<(&[u8], Object)> = Vec::new();

        let page = doc.get_dictionary(page_id)?;
        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }

            let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
            let mut depth = 0;
            while let Some(node_id) = parent {
                if depth == MAX_TREE_DEPTH {
                    break;
                }
                let node = doc.get_dictionary(node_id)?;
                if let Ok(value) = node.get(key) {
                    inherited.push((key, value.clone()));
                    break;
                }
                parent = node.get(b"Parent").and_then(Object::as_reference).ok();
                depth += 1;
            }
        }

        let page = doc.get_dictionary_mut(page_id)?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_requires_inputs() {
        let options = MergeOptions {
            input_paths: vec![],
            output_path: PathBuf::from("merged.pdf"),
        };

        let err = merge_pdfs(&options).unwrap_err();
        assert!(err.to_string().contains("No input files"));
    }

    #[test]
    fn test_flatten_copies_media_box_from_parent() {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        doc.objects.insert(page_id, Object::Dictionary(page));

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages.set("Count", Object::Integer(1));
        pages.set("MediaBox", Object::Array(vec![Object::Integer(0), Object::Integer(0), Object::Integer(842), Object::Integer(595)]));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        flatten_inherited_attributes(&mut doc).unwrap();

        let page = doc.get_dictionary(page_id).unwrap();
        assert!(page.has(b"MediaBox"));
        assert!(!page.has(b"Resources"));
    }

    // Merges of rendered documents are covered in tests/integration.rs
}
