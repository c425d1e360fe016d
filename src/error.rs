//! Error types for the edgequake-doc2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Doc2MdError`] — **Fatal for one call**: the document cannot be
//!   selected, opened, converted or parsed at all. Returned by
//!   [`crate::DocumentExtractor::try_parse`] and by the `extract*` entry
//!   points. [`crate::DocumentExtractor::parse`] absorbs every variant except
//!   at selection time and degrades to an empty string instead.
//!
//! * [`UnitError`] — **Non-fatal**: a single page, sheet, slide or shape
//!   failed but the rest of the document is fine. Unit errors are logged and
//!   the unit contributes a placeholder (or nothing) to the output; they
//!   never abort the containing document.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-doc2md library.
///
/// Unit-level failures use [`UnitError`] and are logged rather than
/// propagated here.
#[derive(Debug, Error)]
pub enum Doc2MdError {
    // ── Selection errors ──────────────────────────────────────────────────
    /// The extension token does not name one of the supported formats.
    ///
    /// This is the only error a caller is expected to surface as a client
    /// error; everything an extractor hits internally degrades to empty text.
    #[error("Unsupported file type: '{extension}'\nSupported: pdf, doc, docx, pptx, xlsx")]
    UnsupportedFormat { extension: String },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Document errors ───────────────────────────────────────────────────
    /// The whole document could not be opened or parsed.
    #[error("Document '{path}' could not be read: {detail}")]
    CorruptDocument { path: PathBuf, detail: String },

    /// Legacy-to-modern conversion did not produce the expected artefact.
    #[error("Conversion of '{path}' failed: {detail}\nIs LibreOffice installed? Set --libreoffice <PATH>.")]
    ConversionFailed { path: PathBuf, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Install pdfium so the system loader finds it.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Doc2MdError {
    /// Shorthand for [`Doc2MdError::CorruptDocument`].
    pub(crate) fn corrupt(path: impl Into<PathBuf>, detail: impl ToString) -> Self {
        Doc2MdError::CorruptDocument {
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}

/// A non-fatal error for a single extraction unit.
///
/// Logged by the extractor that hit it; the unit degrades to an empty or
/// placeholder contribution and extraction continues with the next unit.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum UnitError {
    /// Text-layer extraction or rasterisation failed for a PDF page.
    #[error("Page {page}: {detail}")]
    Page { page: usize, detail: String },

    /// The OCR engine failed on a rasterised page.
    #[error("Page {page}: OCR failed: {detail}")]
    Ocr { page: usize, detail: String },

    /// A worksheet could not be read.
    #[error("Sheet '{sheet}': {detail}")]
    Sheet { sheet: String, detail: String },

    /// A slide part could not be read.
    #[error("Slide {slide}: {detail}")]
    Slide { slide: usize, detail: String },

    /// A shape on a slide could not be parsed.
    #[error("Slide {slide}, shape {shape}: {detail}")]
    Shape {
        slide: usize,
        shape: usize,
        detail: String,
    },
}
