//! Discovery of the HTML files to combine

use std::path::{Path, PathBuf};
use glob::{glob_with, MatchOptions, Pattern};
use crate::error::{Error, Result};
use crate::sort::natural_cmp;

/// File extensions treated as HTML (compared case-insensitively)
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Whether `path` has one of the recognised HTML extensions
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| HTML_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Find the HTML files directly inside `dir`, in natural file name order
///
/// Returns an empty list when the folder has no HTML files; the caller
/// decides whether that is fatal. Hidden files (names starting with `.`,
/// such as macOS `._name.html` sidecars) are skipped.
///
/// The folder path must be valid UTF-8, because it becomes part of a glob
/// pattern; other paths fail with [`Error::InvalidGlob`] even when the
/// folder exists.
///
/// # Example
///
/// ```no_run
/// use html_pdf_merge::discover::find_html_files;
/// use std::path::Path;
///
/// for path in find_html_files(Path::new("lessons")).expect("Failed to scan") {
///     println!("{}", path.display());
/// }
/// ```
pub fn find_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InputDirNotFound(dir.to_path_buf()));
    }

    let dir_str = dir.to_str()
        .ok_or_else(|| Error::InvalidGlob(format!("folder path is not valid UTF-8: {}", dir.display())))?;
    let pattern = format!("{}/*.htm*", Pattern::escape(dir_str.trim_end_matches(['/', '\\'])));

    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut files = Vec::new();
    for entry in glob_with(&pattern, options).map_err(|e| Error::InvalidGlob(e.to_string()))? {
        match entry {
            Ok(path) => {
                if path.is_file() && is_html_file(&path) {
                    files.push(path);
                }
            }
            Err(e) => tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e),
        }
    }

    files.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    tracing::debug!("Found {} HTML file(s) in {}", files.len(), dir.display());

    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
