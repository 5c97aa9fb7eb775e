//! PDF rendering, inspection and merging

pub mod merge;
pub mod metadata;
pub mod render;

// Re-export commonly used items
pub use merge::{merge_pdfs, MergeOptions};
pub use metadata::{count_pages, extract_metadata, PdfMetadata};
pub use render::{CommandRenderer, Engine, RenderJob, Renderer};
