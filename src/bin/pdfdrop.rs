//! CLI binary for pdfdrop.
//!
//! A thin shim over the library crate: the files named on the command line
//! are "dropped" on an [`UploadWidget`] whose view is the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfdrop::file::select_paths;
use pdfdrop::{
    HttpUploader, Locale, Messages, Region, Submission, UploadConfig, UploadOptions, View,
    UploadWidget, WidgetEvent,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal view ────────────────────────────────────────────────────────────

/// Renders the widget's regions on stderr. The pending region is an
/// indicatif spinner; alerts are red lines.
struct TerminalView {
    options: UploadOptions,
    drop_zone: String,
    spinner: Option<ProgressBar>,
    show_progress: bool,
    quiet: bool,
}

impl TerminalView {
    fn new(options: UploadOptions, show_progress: bool, quiet: bool) -> Self {
        Self {
            options,
            drop_zone: "Drop a PDF here".to_string(),
            spinner: None,
            show_progress,
            quiet,
        }
    }

    fn start_spinner(&mut self) {
        if !self.show_progress || self.spinner.is_some() {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Uploading");
        bar.set_message(format!(
            "searchable={} enhance={}",
            self.options.searchable, self.options.enhance
        ));
        bar.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(bar);
    }
}

impl View for TerminalView {
    fn set_visible(&mut self, region: Region, visible: bool) {
        match (region, visible) {
            (Region::Status, true) => self.start_spinner(),
            (Region::Status, false) => {
                if let Some(bar) = self.spinner.take() {
                    bar.finish_and_clear();
                }
            }
            _ => debug!("{} visible={}", region.element_id(), visible),
        }
    }

    fn set_drop_active(&mut self, _active: bool) {}

    fn drop_zone_content(&self) -> String {
        self.drop_zone.clone()
    }

    fn set_drop_zone_content(&mut self, content: &str) {
        self.drop_zone = content.to_string();
    }

    fn options(&self) -> UploadOptions {
        self.options
    }

    fn open_file_picker(&mut self) {
        debug!("No file picker in the terminal; pass files as arguments");
    }

    fn clear_file_input(&mut self) {}

    fn show_result(&mut self, filename: &str, download_url: &str) {
        if !self.quiet {
            eprintln!("{} {}  {}", green("✔"), bold(filename), dim(download_url));
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{} {}", red("✗"), red(message));
    }
}

// ── CLI ──────────────────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Upload a scan as-is (blank pages removed, orientation fixed)
  pdfdrop scan.pdf

  # Add a searchable text layer and clean up the images first
  pdfdrop --searchable --enhance scan.pdf

  # Save the processed file next to the original
  pdfdrop --searchable --save-to . scan.pdf

  # Talk to another server, English messages, JSON result
  pdfdrop --server https://pdf.example.com --lang en --json scan.pdf

ENVIRONMENT VARIABLES:
  PDFDROP_SERVER     Base URL of the processing service
  PDFDROP_LANG       Alert language (ja, en)
  PDFDROP_TIMEOUT    Upload timeout in seconds
  RUST_LOG           Override the log filter
"#;

/// Upload a PDF to the processing service and print the processed file.
#[derive(Parser, Debug)]
#[command(
    name = "pdfdrop",
    version,
    about = "Upload a PDF to the processing service",
    long_about = "Upload a PDF to the processing service, optionally asking for an OCR text \
layer and image enhancement, and print (or download) the processed file. When several files \
are given only the first is uploaded, as with a drop of several files on the page.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to upload. Extra files are ignored.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Base URL of the processing service.
    #[arg(long, env = "PDFDROP_SERVER", default_value = pdfdrop::config::DEFAULT_SERVER_URL)]
    server: String,

    /// Generate a searchable text layer (OCR).
    #[arg(short, long, env = "PDFDROP_SEARCHABLE")]
    searchable: bool,

    /// Enhance scanned images before processing.
    #[arg(short, long, env = "PDFDROP_ENHANCE")]
    enhance: bool,

    /// Download the processed file into this directory.
    #[arg(long, env = "PDFDROP_SAVE_TO")]
    save_to: Option<PathBuf>,

    /// Give up on the upload after this many seconds (default: wait forever).
    #[arg(long, env = "PDFDROP_TIMEOUT")]
    timeout: Option<u64>,

    /// Alert language: ja, en.
    #[arg(long, env = "PDFDROP_LANG", default_value = "ja")]
    lang: Locale,

    /// Print the server's receipt as JSON.
    #[arg(long, env = "PDFDROP_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "PDFDROP_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFDROP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFDROP_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = UploadConfig::builder()
        .server_url(cli.server.clone())
        .locale(cli.lang);
    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }
    let config = builder.build().context("Invalid configuration")?;

    let messages = Messages::new(config.locale);
    let uploader = HttpUploader::new(config).context("Failed to create HTTP client")?;
    let options = UploadOptions::new(cli.searchable, cli.enhance);
    let view = TerminalView::new(options, show_progress, cli.quiet);
    let mut widget = UploadWidget::new(view, uploader, messages);

    // ── Drop the files on the widget ─────────────────────────────────────
    let files = select_paths(&cli.files)
        .await
        .context("Failed to read input file")?;
    let outcome = widget.handle(WidgetEvent::Drop(files)).await;

    let receipt = match outcome {
        Some(Submission::Completed(receipt)) => receipt,
        Some(Submission::Refused(e)) | Some(Submission::Failed(e)) => {
            debug!("Submission ended with: {e}");
            return Ok(ExitCode::FAILURE);
        }
        None => return Ok(ExitCode::FAILURE),
    };

    // ── Report ───────────────────────────────────────────────────────────
    let link = widget
        .uploader()
        .config()
        .resolve(&receipt.download_url)
        .map(|u| u.to_string())
        .unwrap_or_else(|| receipt.download_url.clone());

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&receipt).context("Failed to serialise receipt")?
        );
    } else {
        println!("{link}");
    }

    if let Some(ref dir) = cli.save_to {
        let path = widget
            .uploader()
            .download(&receipt, dir)
            .await
            .context("Failed to download processed file")?;
        if !cli.quiet {
            eprintln!("{}  →  {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    Ok(ExitCode::SUCCESS)
}
