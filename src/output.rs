//! Output types returned by the extraction entry points.

use crate::extractors::PdfKind;
use crate::format::DocumentFormat;
use serde::{Deserialize, Serialize};

/// Result of extracting one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// The input path or URL as given by the caller.
    pub input: String,
    /// Format the document was extracted as.
    pub format: DocumentFormat,
    /// MIME type of the input, from [`DocumentFormat::mime_type`].
    pub mime_type: String,
    /// Normalized Markdown; empty when nothing could be extracted.
    pub markdown: String,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// True when the extractor produced no text.
    pub fn is_empty(&self) -> bool {
        self.markdown.is_empty()
    }
}

/// Size and timing figures for one extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Size of the input document in bytes.
    pub input_bytes: u64,
    /// Characters (not bytes) of Markdown produced.
    pub output_chars: usize,
    /// Wall-clock time of the extraction, including download.
    pub duration_ms: u64,
}

/// What [`crate::inspect_pdf`] learns about a PDF without extracting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfInspection {
    pub page_count: usize,
    /// How many leading pages were sampled for a text layer.
    pub sampled_pages: usize,
    pub kind: PdfKind,
}
