//! The closed set of supported document formats.
//!
//! Extension tokens are mapped here and nowhere else. Anything that is not
//! one of the five tokens is rejected explicitly with
//! [`Doc2MdError::UnsupportedFormat`]; there is no fallback extractor.

use crate::error::Doc2MdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported input format, keyed by its file-extension token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Portable Document Format (native text layer or scanned).
    Pdf,
    /// Legacy binary Word document; converted to `.docx` before extraction.
    Doc,
    /// Office Open XML word-processing document.
    Docx,
    /// Office Open XML presentation.
    Pptx,
    /// Office Open XML workbook.
    Xlsx,
}

impl DocumentFormat {
    /// Every supported format, in a stable order.
    pub const ALL: [DocumentFormat; 5] = [
        DocumentFormat::Pdf,
        DocumentFormat::Doc,
        DocumentFormat::Docx,
        DocumentFormat::Pptx,
        DocumentFormat::Xlsx,
    ];

    /// Map an extension token (no leading dot) to a format.
    ///
    /// The comparison is case-insensitive; surrounding whitespace and dots
    /// are *not* stripped, so `".pdf"` is rejected.
    pub fn from_extension(extension: &str) -> Result<Self, Doc2MdError> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "doc" => Ok(DocumentFormat::Doc),
            "docx" => Ok(DocumentFormat::Docx),
            "pptx" => Ok(DocumentFormat::Pptx),
            "xlsx" => Ok(DocumentFormat::Xlsx),
            _ => Err(Doc2MdError::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// The canonical extension token for this format.
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Doc => "doc",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pptx => "pptx",
            DocumentFormat::Xlsx => "xlsx",
        }
    }

    /// MIME type reported alongside extracted output.
    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Doc => "application/msword",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            DocumentFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = Doc2MdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentFormat::from_extension(s)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
