//! Format-specific extractors.
//!
//! Every extractor implements [`DocumentExtractor`]. The closed enum
//! [`Extractor`] unifies the four variants; only [`select()`] discriminates
//! between them. Callers hold an `Extractor` and call `parse` or `try_parse`
//! without knowing which format they are dealing with.
//!
//! ## Two ways to parse
//!
//! * [`DocumentExtractor::try_parse`] returns `Err` when the whole document
//!   could not be read (corrupt container, failed conversion, no pdfium).
//! * [`DocumentExtractor::parse`] never fails: it logs the error, swallows
//!   panics from inside the extractor, and returns an empty string.
//!
//! An empty string from either is a valid "nothing to extract" result.

pub mod pdf;
pub mod presentation;
pub mod select;
pub mod spreadsheet;
pub mod word;

pub use pdf::{classify, PdfExtractor, PdfKind};
pub use presentation::PresentationExtractor;
pub use select::select;
pub use spreadsheet::{SheetSource, SpreadsheetExtractor};
pub use word::WordExtractor;

use crate::error::Doc2MdError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use tracing::error;

/// Marker placed between PDF pages that both have content.
pub const PAGE_BREAK: &str = "\n\n--- Page Break ---\n\n";

/// Marker placed between spreadsheet sections.
pub const SHEET_BREAK: &str = "\n\n--- Sheet Break ---\n\n";

/// Turns a document on disk into normalized Markdown.
///
/// Implementations hold no mutable state; one instance may be shared across
/// threads and reused for any number of documents.
pub trait DocumentExtractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract, reporting whole-document failure as an error.
    fn try_parse(&self, path: &Path) -> Result<String, Doc2MdError>;

    /// Extract, degrading every failure to an empty string.
    fn parse(&self, path: &Path) -> String {
        match catch_unwind(AssertUnwindSafe(|| self.try_parse(path))) {
            Ok(Ok(markdown)) => markdown,
            Ok(Err(e)) => {
                error!(extractor = self.name(), path = %path.display(), "Extraction failed: {e}");
                String::new()
            }
            Err(_) => {
                error!(extractor = self.name(), path = %path.display(), "Extractor panicked");
                String::new()
            }
        }
    }
}

/// The closed set of extractors.
#[derive(Debug, Clone)]
pub enum Extractor {
    Pdf(PdfExtractor),
    Word(WordExtractor),
    Spreadsheet(SpreadsheetExtractor),
    Presentation(PresentationExtractor),
}

impl DocumentExtractor for Extractor {
    fn name(&self) -> &'static str {
        match self {
            Extractor::Pdf(x) => x.name(),
            Extractor::Word(x) => x.name(),
            Extractor::Spreadsheet(x) => x.name(),
            Extractor::Presentation(x) => x.name(),
        }
    }

    fn try_parse(&self, path: &Path) -> Result<String, Doc2MdError> {
        match self {
            Extractor::Pdf(x) => x.try_parse(path),
            Extractor::Word(x) => x.try_parse(path),
            Extractor::Spreadsheet(x) => x.try_parse(path),
            Extractor::Presentation(x) => x.try_parse(path),
        }
    }
}

/// Join non-empty parts with `separator`.
pub(crate) fn join_nonempty<I>(parts: I, separator: &str) -> String
where
    I: IntoIterator<Item = String>,
{
    parts
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
