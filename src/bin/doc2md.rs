//! CLI binary for edgequake-doc2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use edgequake_doc2md::{
    extract, extract_many, extract_to_file, inspect_pdf, DocumentFormat, ExtractionConfig,
    ExtractionOutput, ExtractionProgressCallback, PdfKind, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

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
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress for batch runs: a bar plus one log line per document.
/// Documents finish out of order, so lines are printed as they complete.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);
        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracting {total} documents…"))
        ));
    }

    fn on_document_start(&self, _index: usize, _total: usize, input: &str) {
        self.bar.set_message(input.to_string());
    }

    fn on_document_complete(&self, index: usize, total: usize, markdown_len: usize) {
        let mark = if markdown_len == 0 { cyan("∅") } else { green("✓") };
        self.bar.println(format!(
            "  {} #{:>3}/{:<3}  {}",
            mark,
            index,
            total,
            dim(&format!("{markdown_len:>7} bytes")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let first_line = error.lines().next().unwrap_or(error);
        self.bar.println(format!(
            "  {} #{:>3}/{:<3}  {}",
            red("✗"),
            index,
            total,
            red(first_line),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let failed = total.saturating_sub(success_count);
        if failed == 0 {
            eprintln!("{} {} documents extracted", green("✔"), bold(&success_count.to_string()));
        } else {
            eprintln!(
                "{} {}/{} documents extracted  ({} failed)",
                if failed == total { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r###"EXAMPLES:
  # Single document to stdout
  doc2md report.docx

  # Write to a file
  doc2md scan.pdf -o scan.md

  # Several documents into a directory (one .md per input)
  doc2md a.pdf b.xlsx c.pptx -o out/

  # Force the format when the extension lies
  doc2md --format xlsx export.bin

  # Scanned PDF in English only, higher DPI
  doc2md --ocr-lang eng --ocr-dpi 400 invoice.pdf

  # Native vs scanned, without extracting
  doc2md --inspect-only document.pdf

  # JSON output (input, format, mime_type, markdown, stats)
  doc2md --json deck.pptx > deck.json

SUPPORTED FORMATS:
  pdf    text layer, or rasterise + OCR when the first pages have no text
  doc    converted to docx with LibreOffice, then extracted
  docx   paragraphs (bold/italic/underline) and tables
  xlsx   one "## Sheet: <name>" table per worksheet
  pptx   one "## Slide <n>" section per slide

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH    Path to libpdfium (default: system library search path)
  TESSERACT_CMD      tesseract executable (default: tesseract)
  LIBREOFFICE_CMD    LibreOffice executable (default: libreoffice)
  OCR_LANG           Tesseract language spec (default: vie+eng)
  RUST_LOG           Log filter, overrides --verbose/--quiet
"###;

/// Convert PDF, Word, Excel and PowerPoint documents to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "doc2md",
    version,
    about = "Convert PDF, Word, Excel and PowerPoint documents to Markdown",
    long_about = "Convert documents (local files or URLs) to normalized Markdown. PDFs are read \
from their text layer when they have one and OCR'd with tesseract otherwise; legacy .doc files \
are converted with LibreOffice first.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local file paths or HTTP/HTTPS URLs.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (one input) or directory (several inputs). Default: stdout.
    #[arg(short, long, env = "DOC2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Force the input format instead of using the extension.
    #[arg(long, env = "DOC2MD_FORMAT")]
    format: Option<DocumentFormat>,

    /// Tesseract language spec, e.g. vie+eng.
    #[arg(long = "ocr-lang", env = "OCR_LANG", default_value = "vie+eng")]
    ocr_lang: String,

    /// Rasterisation DPI for OCR (72–600).
    #[arg(long, env = "DOC2MD_OCR_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    ocr_dpi: u32,

    /// Tesseract page segmentation mode.
    #[arg(long, env = "DOC2MD_OCR_PSM", default_value_t = 6)]
    ocr_psm: u8,

    /// Tesseract OCR engine mode.
    #[arg(long, env = "DOC2MD_OCR_OEM", default_value_t = 3)]
    ocr_oem: u8,

    /// Leading PDF pages sampled for a text layer.
    #[arg(long, env = "DOC2MD_SAMPLE_PAGES", default_value_t = 3)]
    sample_pages: usize,

    /// tesseract executable.
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    tesseract: String,

    /// LibreOffice executable used for .doc conversion.
    #[arg(long, env = "LIBREOFFICE_CMD", default_value = "libreoffice")]
    libreoffice: String,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Documents extracted concurrently.
    #[arg(short, long, env = "DOC2MD_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Output structured JSON (ExtractionOutput) instead of Markdown.
    #[arg(long, env = "DOC2MD_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOC2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Print page count and native/scanned classification of a PDF only.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOC2MD_QUIET")]
    quiet: bool,

    /// Also write logs to a daily-rotated file in this directory.
    #[arg(long, env = "DOC2MD_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "DOC2MD_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let batch = cli.inputs.len() > 1;
    let show_progress = batch && !cli.quiet && !cli.no_progress && !cli.json;
    let _log_guard = init_logging(&cli, show_progress)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        for input in &cli.inputs {
            let info = inspect_pdf(input, &config)
                .await
                .with_context(|| format!("Failed to inspect {input}"))?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&info).context("Failed to serialise inspection")?
                );
            } else {
                println!("File:         {}", input);
                println!("Pages:        {}", info.page_count);
                println!("Sampled:      {}", info.sampled_pages);
                println!(
                    "Kind:         {}",
                    match info.kind {
                        PdfKind::Native => "native (text layer)",
                        PdfKind::Scanned => "scanned (OCR)",
                    }
                );
            }
        }
        return Ok(());
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    if batch {
        run_batch(&cli, &config).await
    } else {
        run_single(&cli, &config, &cli.inputs[0]).await
    }
}

async fn run_single(cli: &Cli, config: &ExtractionConfig, input: &str) -> Result<()> {
    if let Some(ref output_path) = cli.output {
        let stats = extract_to_file(input, output_path, config)
            .await
            .context("Extraction failed")?;
        if !cli.quiet {
            eprintln!(
                "{}  {} chars  {}ms  →  {}",
                if stats.output_chars == 0 { cyan("∅") } else { green("✔") },
                stats.output_chars,
                stats.duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
        return Ok(());
    }

    let output = extract(input, config).await.context("Extraction failed")?;
    print_output(cli, &output)?;
    if !cli.quiet && !cli.json {
        eprintln!(
            "{}",
            dim(&format!(
                "{} ({}): {} chars in {}ms",
                output.input, output.format, output.stats.output_chars, output.stats.duration_ms
            ))
        );
    }
    Ok(())
}

async fn run_batch(cli: &Cli, config: &ExtractionConfig) -> Result<()> {
    if let Some(ref dir) = cli.output {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let results = extract_many(&cli.inputs, config).await;
    let names = output_names(&cli.inputs, cli.json);
    let mut failures = 0usize;

    for ((input, result), name) in cli.inputs.iter().zip(results).zip(names) {
        match result {
            Ok(output) => match cli.output {
                Some(ref dir) => {
                    let target = dir.join(name);
                    let body = if cli.json {
                        serde_json::to_string_pretty(&output).context("Failed to serialise output")?
                    } else {
                        output.markdown
                    };
                    tokio::fs::write(&target, body)
                        .await
                        .with_context(|| format!("Failed to write {}", target.display()))?;
                }
                None => print_output(cli, &output)?,
            },
            Err(e) => {
                failures += 1;
                if cli.quiet || cli.no_progress || cli.json {
                    eprintln!("{} {}: {}", red("✗"), input, e);
                }
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} documents failed", cli.inputs.len());
    }
    Ok(())
}

fn print_output(cli: &Cli, output: &ExtractionOutput) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if cli.json {
        let json = serde_json::to_string_pretty(output).context("Failed to serialise output")?;
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    } else {
        handle
            .write_all(output.markdown.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.markdown.ends_with('\n') {
            handle.write_all(b"\n").context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// `<stem>.md` (or `.json`) for an input path or URL.
fn output_name(input: &str, json: bool) -> String {
    let last = input.rsplit('/').next().unwrap_or(input);
    let last = last.split(['?', '#']).next().unwrap_or(last);
    let stem = Path::new(last)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string());
    let ext = if json { "json" } else { "md" };
    format!("{stem}.{ext}")
}

/// One output name per input, unique within the batch.
///
/// A repeated stem gets a `-2`, `-3`, ... suffix in input order.
fn output_names(inputs: &[String], json: bool) -> Vec<String> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let base = output_name(input, json);
            let mut name = base.clone();
            let mut n = 1;
            while !taken.insert(name.clone()) {
                n += 1;
                name = match base.rsplit_once('.') {
                    Some((stem, ext)) => format!("{stem}-{n}.{ext}"),
                    None => format!("{base}-{n}"),
                };
            }
            name
        })
        .collect()
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .ocr_languages(cli.ocr_lang.clone())
        .ocr_dpi(cli.ocr_dpi)
        .ocr_page_segmentation_mode(cli.ocr_psm)
        .ocr_engine_mode(cli.ocr_oem)
        .pdf_sample_pages(cli.sample_pages)
        .tesseract_cmd(cli.tesseract.clone())
        .libreoffice_cmd(cli.libreoffice.clone())
        .concurrency(cli.concurrency)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib.clone());
    }
    if let Some(format) = cli.format {
        builder = builder.format(format);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// stderr logging, plus a daily-rolling file when `--log-dir` is set.
///
/// Library INFO logs are suppressed while the progress bar is drawing.
fn init_logging(cli: &Cli, show_progress: bool) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .boxed();

    let (file_layer, guard) = match cli.log_dir {
        Some(ref dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "doc2md.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}
