//! HTML-to-PDF Merge Library
//!
//! Combines every HTML file in a folder into one PDF.
//! This library provides functionality to:
//! - Find HTML files and order them naturally (`sesion2` before `sesion10`)
//! - Aggregate them into one document with page-break aware styling
//! - Render the document through an external HTML-to-PDF engine
//! - Remember the most recently used input folders
//!
//! # Example
//!
//! ```no_run
//! use html_pdf_merge::build::{build_pdf, BuildOptions, RenderMode};
//! use html_pdf_merge::layout::{PageOrientation, PageSetup, PageSize};
//! use html_pdf_merge::pdf::{CommandRenderer, Engine};
//! use std::path::PathBuf;
//!
//! let options = BuildOptions {
//!     input_dir: PathBuf::from("lessons"),
//!     output_path: PathBuf::from("plan.pdf"),
//!     setup: PageSetup::new(PageSize::A4, PageOrientation::Portrait),
//!     mode: RenderMode::Combined,
//!     title: None,
//! };
//!
//! build_pdf(&options, &CommandRenderer::new(Engine::WeasyPrint)).expect("Failed to build PDF");
//! ```

pub mod build;
pub mod discover;
pub mod error;
pub mod history;
pub mod html;
pub mod layout;
pub mod pdf;
pub mod sort;

// Re-export commonly used items
pub use error::{Error, Result};
