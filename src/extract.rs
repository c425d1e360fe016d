//! Async extraction entry points.
//!
//! Extractors are blocking: pdfium, calamine, zip parsing and the external
//! OCR/conversion processes all run synchronously. Every entry point here
//! moves that work onto `tokio::task::spawn_blocking` so runtime worker
//! threads never stall.
//!
//! The format is decided from the input's extension (or
//! [`ExtractionConfig::format`]) *before* any download happens, so an
//! unsupported input fails fast.

use crate::config::ExtractionConfig;
use crate::error::Doc2MdError;
use crate::extractors::{DocumentExtractor, Extractor, PdfExtractor};
use crate::format::DocumentFormat;
use crate::output::{ExtractionOutput, ExtractionStats, PdfInspection};
use crate::pipeline::input;
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Extract a document file or URL to Markdown.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Returns `Err(Doc2MdError)` only when the input cannot be used at all:
/// - unsupported extension
/// - file not found / permission denied / download failure
/// - internal task failure
///
/// Anything that goes wrong *inside* the document degrades to empty or
/// partial Markdown, never to an error.
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Doc2MdError> {
    let start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    // ── Step 1: Select extractor ─────────────────────────────────────────
    let format = resolve_format(input_str, config)?;
    let extractor = Extractor::for_format(format, config);

    // ── Step 2: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let path = resolved.path().to_path_buf();
    let input_bytes = tokio::fs::metadata(&path).await.map(|m| m.len()).unwrap_or(0);

    // ── Step 3: Extract ──────────────────────────────────────────────────
    let markdown = parse_blocking(extractor, path).await?;
    drop(resolved);

    let stats = ExtractionStats {
        input_bytes,
        output_chars: markdown.chars().count(),
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Extraction complete: {} ({}) → {} chars in {}ms",
        input_str, format, stats.output_chars, stats.duration_ms
    );

    Ok(ExtractionOutput {
        input: input_str.to_string(),
        format,
        mime_type: format.mime_type().to_string(),
        markdown,
        stats,
    })
}

/// Extract a document and write the Markdown directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, Doc2MdError> {
    let output = extract(input_str, config).await?;
    write_atomic(output_path.as_ref(), &output.markdown).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Doc2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Doc2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_str, config))
}

/// Extract a document held in memory.
///
/// `extension` names the format (`"docx"`, `"pdf"`, ...). The bytes are
/// written to a managed temp file carrying that extension, which is removed
/// on return or panic.
///
/// # Example
/// ```rust,no_run
/// use edgequake_doc2md::{extract_from_bytes, ExtractionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes: Vec<u8> = std::fs::read("report.docx")?;
/// let output = extract_from_bytes(&bytes, "docx", &ExtractionConfig::default()).await?;
/// println!("{}", output.markdown);
/// # Ok(())
/// # }
/// ```
pub async fn extract_from_bytes(
    bytes: &[u8],
    extension: &str,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Doc2MdError> {
    let format = match config.format {
        Some(f) => f,
        None => DocumentFormat::from_extension(extension)?,
    };
    let mut tmp = tempfile::Builder::new()
        .prefix("doc2md-upload-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile()
        .map_err(|e| Doc2MdError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| Doc2MdError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();

    let mut output = extract(&path, config).await?;
    output.input = format!("<{} bytes>", bytes.len());
    // `tmp` is dropped (and the file deleted) here
    Ok(output)
}

/// Extract many documents with bounded concurrency.
///
/// Results come back in input order, one per input. A failing input does
/// not affect the others. Progress events go to
/// [`ExtractionConfig::progress_callback`] when set.
pub async fn extract_many<S: AsRef<str>>(
    inputs: &[S],
    config: &ExtractionConfig,
) -> Vec<Result<ExtractionOutput, Doc2MdError>> {
    let total = inputs.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut results: Vec<(usize, Result<ExtractionOutput, Doc2MdError>)> =
        stream::iter(inputs.iter().enumerate().map(|(i, input)| {
            let input = input.as_ref().to_string();
            async move {
                let index = i + 1;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_start(index, total, &input);
                }
                let result = extract(&input, config).await;
                if let Some(ref cb) = config.progress_callback {
                    match &result {
                        Ok(out) => cb.on_document_complete(index, total, out.markdown.len()),
                        Err(e) => cb.on_document_error(index, total, &e.to_string()),
                    }
                }
                (i, result)
            }
        }))
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    results.sort_by_key(|(i, _)| *i);
    let results: Vec<_> = results.into_iter().map(|(_, r)| r).collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    debug!("Batch finished: {}/{} succeeded", successes, total);
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, successes);
    }
    results
}

/// Page count and native/scanned classification of a PDF, without
/// extracting its content.
pub async fn inspect_pdf(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<PdfInspection, Doc2MdError> {
    let resolved = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    let path = resolved.path().to_path_buf();
    let extractor = PdfExtractor::new(config);
    tokio::task::spawn_blocking(move || extractor.inspect(&path))
        .await
        .map_err(|e| Doc2MdError::Internal(format!("Inspect task panicked: {}", e)))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn resolve_format(input_str: &str, config: &ExtractionConfig) -> Result<DocumentFormat, Doc2MdError> {
    match config.format {
        Some(format) => Ok(format),
        None => DocumentFormat::from_extension(&input::extension_of(input_str)),
    }
}

async fn parse_blocking(extractor: Extractor, path: PathBuf) -> Result<String, Doc2MdError> {
    tokio::task::spawn_blocking(move || extractor.parse(&path))
        .await
        .map_err(|e| Doc2MdError::Internal(format!("Extraction task panicked: {}", e)))
}

async fn write_atomic(path: &Path, contents: &str) -> Result<(), Doc2MdError> {
    let write_err = |source| Doc2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, contents).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}
