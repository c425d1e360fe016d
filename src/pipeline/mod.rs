//! Pipeline stages shared by the format extractors.
//!
//! Each submodule does one job and is independently testable. The
//! extractors in [`crate::extractors`] compose them.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extractor ──┬─▶ render ──▶ (text layer) ─────────┬─▶ normalize
//! (URL/path)            │     └──────▶ (bitmap) ──▶ ocr ─────┤
//!                       ├─▶ legacy ──▶ ooxml ──▶ table ──────┤
//!                       └─▶ ooxml / calamine ──▶ table ──────┘
//! ```
//!
//! 1. [`input`]     — canonicalise the user-supplied path or URL to a local file
//! 2. [`render`]    — pdfium page access: text layer and rasterisation
//! 3. [`ocr`]       — external OCR engine over rasterised pages
//! 4. [`legacy`]    — external `.doc` → `.docx` conversion
//! 5. [`ooxml`]     — zip/XML helpers for `.docx` and `.pptx` parts
//! 6. [`table`]     — Markdown pipe-table rendering
//! 7. [`normalize`] — deterministic text canonicalisation, applied last

pub mod input;
pub mod legacy;
pub mod normalize;
pub mod ocr;
pub mod ooxml;
pub mod render;
pub mod table;
