//! html-pdf-merge CLI tool
//!
//! A command-line tool that combines a folder of HTML files into one PDF.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use html_pdf_merge::build::{build_pdf, with_pdf_extension, BuildOptions, BuildReport, RenderMode};
use html_pdf_merge::history::HistoryStore;
use html_pdf_merge::layout::{PageOrientation, PageSetup, PageSize};
use html_pdf_merge::pdf::{extract_metadata, CommandRenderer, Engine};

/// html-pdf-merge - Combine every HTML file in a folder into one PDF
#[derive(Parser)]
#[command(name = "html-pdf-merge")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Guided mode: pick a recent folder, output name and orientation
    html-pdf-merge

    # Landscape A4 (the default)
    html-pdf-merge -i ./sesiones -o plan_completo.pdf

    # Portrait, rendered with wkhtmltopdf, opened afterwards
    html-pdf-merge -i ./sesiones -o plan.pdf --portrait --engine wkhtmltopdf --open")]
struct Cli {
    /// Folder containing the HTML files
    #[arg(short, long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Output PDF file (".pdf" is appended when missing)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Use portrait orientation instead of landscape
    #[arg(short, long)]
    portrait: bool,

    /// Ask for the folder, output name and orientation
    #[arg(long)]
    interactive: bool,

    /// Paper size
    #[arg(long, value_enum, default_value_t = PaperArg::A4)]
    page_size: PaperArg,

    /// HTML-to-PDF engine
    #[arg(long, value_enum, env = "HTML_PDF_MERGE_ENGINE", default_value_t = EngineArg::Weasyprint)]
    engine: EngineArg,

    /// Engine executable, when it is not on PATH under its usual name
    #[arg(long, env = "HTML_PDF_MERGE_ENGINE_PATH", value_name = "PATH")]
    engine_path: Option<PathBuf>,

    /// Render each HTML file on its own and merge the resulting PDFs
    #[arg(long)]
    separate: bool,

    /// Open the output file after creation
    #[arg(long)]
    open: bool,

    /// Do not read or update the recent folders list
    #[arg(long)]
    no_history: bool,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    Letter,
}

impl From<PaperArg> for PageSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => PageSize::A4,
            PaperArg::Letter => PageSize::Letter,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineArg {
    Weasyprint,
    Wkhtmltopdf,
    Chromium,
}

impl From<EngineArg> for Engine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Weasyprint => Engine::WeasyPrint,
            EngineArg::Wkhtmltopdf => Engine::Wkhtmltopdf,
            EngineArg::Chromium => Engine::Chromium,
        }
    }
}

/// What to build, after flags or prompts have been resolved
struct Job {
    input: PathBuf,
    output: PathBuf,
    orientation: PageOrientation,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let history = if cli.no_history { None } else { open_history() };

    let job = if cli.interactive || (cli.input.is_none() && cli.output.is_none()) {
        prompt_job(history.as_ref(), cli.portrait)?
    } else {
        Job {
            input: cli.input.context("the input folder is required: use --input <DIR>")?,
            output: cli.output.context("the output file is required: use --output <FILE>")?,
            orientation: if cli.portrait { PageOrientation::Portrait } else { PageOrientation::Landscape },
        }
    };

    let output = with_pdf_extension(job.output);
    let setup = PageSetup::new(cli.page_size.into(), job.orientation);

    eprintln!("Using {} {} pages", setup.size.css_name(), job.orientation);

    let options = BuildOptions {
        input_dir: job.input,
        output_path: output.clone(),
        setup,
        mode: if cli.separate { RenderMode::Separate } else { RenderMode::Combined },
        title: None,
    };

    let mut renderer = CommandRenderer::new(cli.engine.into());
    if let Some(program) = cli.engine_path {
        renderer = renderer.with_program(program);
    }

    let report = build_pdf(&options, &renderer)
        .with_context(|| format!("could not create {}", output.display()))?;

    print_report(&report);

    // History keeps folders as UTF-8 strings; a non-UTF-8 path is stored lossily
    if let Some(store) = &history {
        if let Err(e) = store.record(report.input_dir.to_string_lossy()) {
            tracing::warn!("Could not update recent folders: {}", e);
        }
    }

    if cli.open {
        open_file(&report.output_path)?;
    }

    Ok(())
}

/// Open the history store, or disable history for this run if the config
/// directory is unusable
fn open_history() -> Option<HistoryStore> {
    match HistoryStore::open() {
        Ok(store) => {
            tracing::debug!("History file: {}", store.path_of_store().display());
            Some(store)
        }
        Err(e) => {
            tracing::warn!("Recent folders disabled: {}", e);
            None
        }
    }
}

/// Ask for folder, output name and orientation
fn prompt_job(history: Option<&HistoryStore>, portrait: bool) -> Result<Job> {
    let theme = ColorfulTheme::default();

    let recent: Vec<String> = history
        .map(|store| store.load())
        .map(|list| list.iter().filter(|p| Path::new(p).is_dir()).map(String::from).collect())
        .unwrap_or_default();

    let input = if recent.is_empty() {
        prompt_folder(&theme)?
    } else {
        let mut items = recent.clone();
        items.push("Another folder...".to_string());

        let choice = Select::with_theme(&theme)
            .with_prompt("Folder containing your HTML files")
            .items(&items)
            .default(0)
            .interact()?;

        match recent.get(choice) {
            Some(folder) => PathBuf::from(folder),
            None => prompt_folder(&theme)?,
        }
    };

    let output: String = Input::with_theme(&theme)
        .with_prompt("Output PDF name (e.g. plan_completo.pdf)")
        .validate_with(|name: &String| -> std::result::Result<(), &'static str> {
            if name.trim().is_empty() {
                Err("the name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let orientations = ["Landscape", "Portrait"];
    let orientation = Select::with_theme(&theme)
        .with_prompt("Page orientation")
        .items(&orientations)
        .default(if portrait { 1 } else { 0 })
        .interact()?;

    Ok(Job {
        input,
        output: PathBuf::from(output.trim()),
        orientation: if orientation == 1 { PageOrientation::Portrait } else { PageOrientation::Landscape },
    })
}

fn prompt_folder(theme: &ColorfulTheme) -> Result<PathBuf> {
    let folder: String = Input::with_theme(theme)
        .with_prompt("Folder containing your HTML files")
        .validate_with(|path: &String| -> std::result::Result<(), String> {
            if Path::new(path.trim()).is_dir() {
                Ok(())
            } else {
                Err(format!("not a folder: {}", path.trim()))
            }
        })
        .interact_text()?;

    Ok(PathBuf::from(folder.trim()))
}

fn print_report(report: &BuildReport) {
    eprintln!("Combined {} HTML file(s) in this order:", report.files.len());
    for (i, file) in report.files.iter().enumerate() {
        let name = file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        eprintln!("  {}. {}", i + 1, name);
    }

    match extract_metadata(&report.output_path) {
        Ok(meta) => {
            if let Some(producer) = meta.producer {
                tracing::info!("Rendered by {}", producer);
            }
        }
        Err(e) => tracing::debug!("Could not read metadata back: {}", e),
    }

    eprintln!("Created {} with {} page(s)", report.output_path.display(), report.page_count);
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .context("could not launch the PDF viewer")?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .context("could not launch the PDF viewer")?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .spawn()
            .context("could not launch the PDF viewer")?;
    }
    Ok(())
}
