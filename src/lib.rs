//! # edgequake-doc2md
//!
//! Convert PDF, Word, Excel and PowerPoint documents to normalized Markdown.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document
//!  │
//!  ├─ 1. Select   extension token → one of four extractors (pdf/word/spreadsheet/presentation)
//!  ├─ 2. Input    resolve local file or download from URL
//!  ├─ 3. Extract  format-specific, blocking (spawn_blocking)
//!  │     ├─ PDF   text layer when the leading pages have one, else rasterise + OCR
//!  │     ├─ Word  document.xml paragraphs/tables; .doc converted via LibreOffice first
//!  │     ├─ Excel one `## Sheet:` table per worksheet
//!  │     └─ PPTX  one `## Slide n` section per slide, in presentation order
//!  └─ 4. Normalize  CR removal, bullet canonicalisation, blank-line collapse, trim
//! ```
//!
//! Partial failures (one page, sheet, slide or shape) are logged and skipped.
//! A document that cannot be read at all yields an empty string from
//! [`DocumentExtractor::parse`]; use [`DocumentExtractor::try_parse`] to see
//! the error instead.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_doc2md::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("report.docx", &config).await?;
//!     println!("{}", output.markdown);
//!     Ok(())
//! }
//! ```
//!
//! Blocking callers can select an extractor directly:
//!
//! ```rust,no_run
//! use edgequake_doc2md::{select, DocumentExtractor, ExtractionConfig};
//! use std::path::Path;
//!
//! let extractor = select("xlsx", &ExtractionConfig::default())?;
//! let markdown = extractor.parse(Path::new("budget.xlsx"));
//! # Ok::<(), edgequake_doc2md::Doc2MdError>(())
//! ```
//!
//! ## External tools
//!
//! | Needed for | Tool | Config |
//! |------------|------|--------|
//! | any PDF | pdfium shared library | `pdfium_lib_path` / `PDFIUM_LIB_PATH` |
//! | scanned PDF | `tesseract` with the requested language packs | `tesseract_cmd`, `ocr_languages` |
//! | `.doc` | `libreoffice` (headless) | `libreoffice_cmd` |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2md` binary (clap, anyhow, indicatif, tracing-subscriber, tracing-appender) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-doc2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod extractors;
pub mod format;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, MAX_RENDERED_PIXELS_LIMIT};
pub use error::{Doc2MdError, UnitError};
pub use extract::{extract, extract_from_bytes, extract_many, extract_sync, extract_to_file, inspect_pdf};
pub use extractors::{
    classify, select, DocumentExtractor, Extractor, PdfExtractor, PdfKind, PresentationExtractor, SheetSource,
    SpreadsheetExtractor, WordExtractor, PAGE_BREAK, SHEET_BREAK,
};
pub use format::DocumentFormat;
pub use output::{ExtractionOutput, ExtractionStats, PdfInspection};
pub use pipeline::legacy::{DocumentConverter, LibreOfficeConverter};
pub use pipeline::normalize::normalize;
pub use pipeline::ocr::{OcrEngine, TesseractOcr};
pub use pipeline::render::PageSource;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
