//! One complete run: discover, aggregate, render, place the output

use std::fs;
use std::path::{Path, PathBuf};
use crate::discover::find_html_files;
use crate::error::{Error, Result};
use crate::html::Document;
use crate::layout::PageSetup;
use crate::pdf::{count_pages, merge_pdfs, MergeOptions, RenderJob, Renderer};

/// How the HTML files are turned into pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Concatenate all files into one HTML document and render it once
    #[default]
    Combined,
    /// Render every file on its own and merge the resulting PDFs
    Separate,
}

/// Options for building a PDF from a folder
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Folder containing the HTML files
    pub input_dir: PathBuf,
    /// Destination PDF path
    pub output_path: PathBuf,
    pub setup: PageSetup,
    pub mode: RenderMode,
    /// Document title; defaults to the folder name
    pub title: Option<String>,
}

/// What a successful build produced
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// HTML files in the order they were rendered
    pub files: Vec<PathBuf>,
    /// Canonical input folder
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    pub page_count: usize,
}

/// Append `.pdf` unless the path already ends with it (any case)
pub fn with_pdf_extension(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    let has_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if has_pdf {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".pdf");
        PathBuf::from(name)
    }
}

/// Build a single PDF from every HTML file in `options.input_dir`
///
/// The engine writes into a temporary file next to the destination; it is
/// checked with lopdf and moved into place only when everything succeeded,
/// so a failed run never leaves a partial PDF behind.
///
/// # Example
///
/// ```no_run
/// use html_pdf_merge::build::{build_pdf, BuildOptions, RenderMode};
/// use html_pdf_merge::layout::PageSetup;
/// use html_pdf_merge::pdf::{CommandRenderer, Engine};
/// use std::path::PathBuf;
///
/// let options = BuildOptions {
///     input_dir: PathBuf::from("lessons"),
///     output_path: PathBuf::from("plan.pdf"),
///     setup: PageSetup::default(),
///     mode: RenderMode::Combined,
///     title: None,
/// };
///
/// let report = build_pdf(&options, &CommandRenderer::new(Engine::WeasyPrint)).expect("Failed to build");
/// println!("{} pages", report.page_count);
/// ```
pub fn build_pdf(options: &BuildOptions, renderer: &dyn Renderer) -> Result<BuildReport> {
    let files = find_html_files(&options.input_dir)?;
    if files.is_empty() {
        return Err(Error::NoHtmlFiles(options.input_dir.clone()));
    }

    let input_dir = fs::canonicalize(&options.input_dir)
        .map_err(|_| Error::InputDirNotFound(options.input_dir.clone()))?;

    let title = options.title.clone().unwrap_or_else(|| {
        input_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let output_dir = match options.output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let staged = tempfile::Builder::new()
        .prefix(".html-pdf-merge-")
        .suffix(".pdf")
        .tempfile_in(&output_dir)
        .map_err(|source| Error::OutputWrite {
            path: options.output_path.clone(),
            source,
        })?;

    tracing::info!(
        "Rendering {} file(s) from {} with {} ({:?} mode)",
        files.len(),
        input_dir.display(),
        renderer.name(),
        options.mode
    );

    match options.mode {
        RenderMode::Combined => {
            let document = Document::from_files(&files, options.setup)?
                .with_title(title)
                .with_base_dir(&input_dir);
            let job = RenderJob::from_document(&document, Some(&input_dir));
            renderer.render(&job, staged.path())?;
        }
        RenderMode::Separate => {
            render_separately(&files, &input_dir, &title, options.setup, renderer, staged.path())?;
        }
    }

    let page_count = count_pages(staged.path()).map_err(|e| {
        Error::Render(format!("{} produced an unreadable PDF: {}", renderer.name(), e))
    })?;
    if page_count == 0 {
        return Err(Error::Render(format!("{} produced a PDF without pages", renderer.name())));
    }

    staged
        .persist(&options.output_path)
        .map_err(|e| Error::OutputWrite {
            path: options.output_path.clone(),
            source: e.error,
        })?;

    Ok(BuildReport {
        files,
        input_dir,
        output_path: options.output_path.clone(),
        page_count,
    })
}

/// Render each file into its own PDF in a scratch folder, then merge them
/// into `output` in order
fn render_separately(
    files: &[PathBuf],
    input_dir: &Path,
    title: &str,
    setup: PageSetup,
    renderer: &dyn Renderer,
    output: &Path,
) -> Result<()> {
    let scratch = tempfile::Builder::new().prefix("html-pdf-merge-parts-").tempdir()?;
    let mut parts = Vec::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        tracing::debug!("Rendering part {} of {}: {}", index + 1, files.len(), file.display());

        let document = Document::from_files(std::slice::from_ref(file), setup)?
            .with_title(title)
            .with_base_dir(input_dir);
        let part = scratch.path().join(format!("part-{:04}.pdf", index));
        renderer.render(&RenderJob::from_document(&document, Some(input_dir)), &part)?;
        parts.push(part);
    }

    merge_pdfs(&MergeOptions {
        input_paths: parts,
        output_path: output.to_path_buf(),
    })?;

    Ok(())
}
