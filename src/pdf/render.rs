//! HTML-to-PDF rendering through an external engine
//!
//! The engine is a black box: it receives HTML plus CSS and writes PDF bytes
//! to a path. [`CommandRenderer`] drives one of the common command-line
//! engines; anything else can implement [`Renderer`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use url::Url;
use crate::error::{Error, Result};
use crate::html::Document;
use crate::layout::PageSetup;

/// Everything an engine needs to produce one PDF
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Combined HTML without the shared stylesheet
    pub html: String,
    /// Combined HTML with the shared stylesheet inlined
    pub standalone_html: String,
    /// Shared stylesheet (page size, break avoidance)
    pub css: String,
    /// Folder that relative asset links resolve against
    pub base_dir: Option<PathBuf>,
    pub setup: PageSetup,
}

impl RenderJob {
    pub fn from_document(document: &Document, base_dir: Option<&Path>) -> Self {
        Self {
            html: document.html(),
            standalone_html: document.standalone_html(),
            css: document.stylesheet(),
            base_dir: base_dir.map(Path::to_path_buf),
            setup: *document.setup(),
        }
    }
}

/// Produces a PDF file from a [`RenderJob`]
pub trait Renderer {
    /// Short name used in log and error messages
    fn name(&self) -> &str;

    /// Write the PDF for `job` to `output`, replacing its contents
    fn render(&self, job: &RenderJob, output: &Path) -> Result<()>;
}

/// Supported command-line engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    #[default]
    WeasyPrint,
    Wkhtmltopdf,
    Chromium,
}

impl Engine {
    /// Program looked up on `PATH` when no explicit binary is given
    pub fn default_program(self) -> &'static str {
        match self {
            Engine::WeasyPrint => "weasyprint",
            Engine::Wkhtmltopdf => "wkhtmltopdf",
            Engine::Chromium => "chromium",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_program())
    }
}

/// Runs an engine binary as a child process
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    engine: Engine,
    program: PathBuf,
}

impl CommandRenderer {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            program: PathBuf::from(engine.default_program()),
        }
    }

    /// Use `program` instead of the engine's default binary name
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Build the engine invocation for files already written to disk
    fn command(&self, job: &RenderJob, html_path: &Path, css_path: &Path, output: &Path) -> Result<Command> {
        let mut cmd = Command::new(&self.program);

        match self.engine {
            Engine::WeasyPrint => {
                cmd.arg("--stylesheet").arg(css_path);
                if let Some(base) = &job.base_dir {
                    cmd.arg("--base-url").arg(base);
                }
                cmd.arg(html_path).arg(output);
            }
            Engine::Wkhtmltopdf => {
                // wkhtmltopdf ignores the @page size descriptor
                let margin = format!("{}mm", job.setup.margin.mm());
                cmd.arg("--quiet")
                    .arg("--enable-local-file-access")
                    .args(["--page-size", job.setup.size.css_name()])
                    .args(["--orientation", capitalized(job.setup.orientation.css_keyword()).as_str()])
                    .args(["--margin-top", &margin, "--margin-bottom", &margin])
                    .args(["--margin-left", &margin, "--margin-right", &margin])
                    .arg(html_path)
                    .arg(output);
            }
            Engine::Chromium => {
                let url = Url::from_file_path(html_path)
                    .map_err(|_| Error::Render(format!("cannot build a file URL for {}", html_path.display())))?;
                cmd.arg("--headless")
                    .arg("--disable-gpu")
                    .arg("--no-pdf-header-footer")
                    .arg("--allow-file-access-from-files")
                    .arg(format!("--print-to-pdf={}", output.display()))
                    .arg(url.as_str());
            }
        }

        Ok(cmd)
    }
}

impl Renderer for CommandRenderer {
    fn name(&self) -> &str {
        self.engine.default_program()
    }

    fn render(&self, job: &RenderJob, output: &Path) -> Result<()> {
        let output = absolute(output)?;

        let scratch = tempfile::Builder::new().prefix("html-pdf-merge-").tempdir()?;
        let html_path = scratch.path().join("document.html");
        let css_path = scratch.path().join("page.css");

        match self.engine {
            Engine::WeasyPrint => {
                fs::write(&html_path, &job.html)?;
                fs::write(&css_path, &job.css)?;
            }
            Engine::Wkhtmltopdf | Engine::Chromium => fs::write(&html_path, &job.standalone_html)?,
        }

        let mut cmd = self.command(job, &html_path, &css_path, &output)?;
        tracing::debug!("Running {:?}", cmd);

        let result = cmd.output().map_err(|e| {
            Error::Render(format!("could not run {}: {}", self.program.display(), e))
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::Render(format!(
                "{} exited with {}: {}",
                self.name(),
                result.status,
                stderr.trim()
            )));
        }

        let written = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(Error::Render(format!("{} produced no output", self.name())));
        }

        tracing::info!("{} wrote {} bytes", self.name(), written);
        Ok(())
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
