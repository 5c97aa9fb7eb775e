//! HTML aggregation and style injection

pub mod document;
pub mod style;

// Re-export commonly used items
pub use document::{escape_html, Document, SourceFragment};
pub use style::{shared_stylesheet, BREAK_AVOIDANCE_CSS, SECTION_CLASS};
