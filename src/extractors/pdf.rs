//! PDF extraction: native text layer or rasterise-and-OCR.
//!
//! ## Classification
//!
//! The first `sample_pages` pages (default 3) are checked for a text layer
//! with non-whitespace content. One such page is enough to call the document
//! native. Otherwise (including a zero-page document) it is scanned.
//! Only the leading pages are sampled, so a scanned cover in front of a
//! born-digital body still counts as native, and a document whose text
//! layer starts on page 4 is OCR'd.
//!
//! ## Per-page failures
//!
//! A page whose text layer, rasterisation or OCR fails contributes nothing;
//! the failure is logged and the next page proceeds. The page-break marker
//! only ever sits between two pages that both produced text.

use super::{join_nonempty, DocumentExtractor, PAGE_BREAK};
use crate::config::ExtractionConfig;
use crate::error::Doc2MdError;
use crate::output::PdfInspection;
use crate::pipeline::normalize::normalize;
use crate::pipeline::ocr::{OcrEngine, TesseractOcr};
use crate::pipeline::render::{bind_pdfium, PageSource, PdfiumDocument};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a PDF's text will be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfKind {
    /// At least one sampled page carries a text layer.
    Native,
    /// No sampled page carries text; pages are OCR'd.
    Scanned,
}

/// Decide native vs scanned from the first `sample_pages` pages.
pub fn classify<S: PageSource + ?Sized>(source: &S, sample_pages: usize) -> PdfKind {
    let sampled = sample_pages.min(source.page_count());
    for index in 0..sampled {
        match source.page_text(index) {
            Ok(text) if !text.trim().is_empty() => return PdfKind::Native,
            Ok(_) => {}
            Err(e) => debug!("Sampling: {e}"),
        }
    }
    PdfKind::Scanned
}

/// Extractor for `.pdf` documents.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    sample_pages: usize,
    ocr_dpi: u32,
    max_rendered_pixels: u32,
    pdfium_lib_path: Option<PathBuf>,
    ocr: Arc<dyn OcrEngine>,
}

impl PdfExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            sample_pages: config.pdf_sample_pages,
            ocr_dpi: config.ocr_dpi,
            max_rendered_pixels: config.max_rendered_pixels,
            pdfium_lib_path: config.pdfium_lib_path.clone(),
            ocr: Arc::new(TesseractOcr::from_config(config)),
        }
    }

    /// Replace the OCR engine used for scanned documents.
    pub fn with_ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.ocr = engine;
        self
    }

    /// Run classification and extraction against any page source.
    pub fn extract_from<S: PageSource + ?Sized>(&self, source: &S) -> String {
        let kind = classify(source, self.sample_pages);
        info!("PDF classified as {:?} ({} pages)", kind, source.page_count());
        let raw = match kind {
            PdfKind::Native => self.native_text(source),
            PdfKind::Scanned => self.ocr_text(source),
        };
        normalize(&raw)
    }

    /// Page count and classification without extracting content.
    pub fn inspect(&self, path: &Path) -> Result<PdfInspection, Doc2MdError> {
        let pdfium = bind_pdfium(self.pdfium_lib_path.as_deref())?;
        let document = PdfiumDocument::open(&pdfium, path, self.max_rendered_pixels)?;
        let page_count = document.page_count();
        Ok(PdfInspection {
            page_count,
            sampled_pages: self.sample_pages.min(page_count),
            kind: classify(&document, self.sample_pages),
        })
    }

    fn native_text<S: PageSource + ?Sized>(&self, source: &S) -> String {
        let pages = (0..source.page_count()).map(|index| match source.page_text(index) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("{e}");
                String::new()
            }
        });
        join_nonempty(pages, PAGE_BREAK)
    }

    fn ocr_text<S: PageSource + ?Sized>(&self, source: &S) -> String {
        let total = source.page_count();
        let pages = (0..total).map(|index| {
            let page = index + 1;
            let text = source
                .render_page(index, self.ocr_dpi)
                .and_then(|image| self.ocr.recognize(&image, page));
            match text {
                Ok(text) => {
                    debug!("OCR page {}/{} done", page, total);
                    text.trim().to_string()
                }
                Err(e) => {
                    warn!("{e}");
                    String::new()
                }
            }
        });
        join_nonempty(pages, PAGE_BREAK)
    }
}

impl DocumentExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn try_parse(&self, path: &Path) -> Result<String, Doc2MdError> {
        let pdfium = bind_pdfium(self.pdfium_lib_path.as_deref())?;
        let document = PdfiumDocument::open(&pdfium, path, self.max_rendered_pixels)?;
        Ok(self.extract_from(&document))
    }
}
