//! Error types for the html-pdf-merge library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the html-pdf-merge library
#[derive(Error, Debug)]
pub enum Error {
    /// The per-user config directory could not be resolved or created
    #[error("Cannot use config directory: {0}")]
    ConfigDir(String),

    /// Input directory missing or not a directory
    #[error("Input folder not found or not a directory: {}", .0.display())]
    InputDirNotFound(PathBuf),

    /// Directory exists but contains no HTML files
    #[error("No .html files found in folder: {}", .0.display())]
    NoHtmlFiles(PathBuf),

    /// An input file could not be read or decoded as UTF-8 text
    #[error("Cannot read HTML file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rendering engine failed
    #[error("Rendering failed: {0}")]
    Render(String),

    /// The final PDF could not be placed at its destination
    #[error("Cannot write output file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// General error
    #[error("{0}")]
    General(String),
}
