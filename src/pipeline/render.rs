//! PDF page access via pdfium: text layer and rasterisation.
//!
//! The PDF extractor never talks to pdfium directly. It works against the
//! [`PageSource`] trait, and [`PdfiumDocument`] is the production
//! implementation. Everything here is blocking; callers run it inside
//! `tokio::task::spawn_blocking` (see [`crate::extract`]).
//!
//! ## Why cap pixels as well as DPI?
//!
//! 300 DPI on an A0 poster is a 10 000 × 14 000 px bitmap.
//! `max_rendered_pixels` caps the longest edge regardless of physical size.

use crate::error::{Doc2MdError, UnitError};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Page-level access to a PDF document.
///
/// Page indices are 0-based. Per-page failures are reported as
/// [`UnitError`]s with 1-based page numbers.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Raw text layer of one page (may be empty or whitespace).
    fn page_text(&self, index: usize) -> Result<String, UnitError>;

    /// Rasterise one page at the given DPI.
    fn render_page(&self, index: usize, dpi: u32) -> Result<DynamicImage, UnitError>;
}

/// Bind to the pdfium shared library.
///
/// With `lib_path` set, that exact library is loaded; otherwise the system
/// loader search path is used.
pub fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, Doc2MdError> {
    let bindings = match lib_path {
        Some(path) => {
            debug!("Binding pdfium from {}", path.display());
            Pdfium::bind_to_library(&*path.to_string_lossy())
        }
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| Doc2MdError::PdfiumBindingFailed(format!("{e:?}")))?;
    Ok(Pdfium::new(bindings))
}

/// A PDF opened through pdfium.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    max_rendered_pixels: u32,
}

impl<'a> PdfiumDocument<'a> {
    /// Open `path`. Failure to open is a whole-document failure.
    pub fn open(pdfium: &'a Pdfium, path: &Path, max_rendered_pixels: u32) -> Result<Self, Doc2MdError> {
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Doc2MdError::corrupt(path, format!("{e:?}")))?;
        info!("PDF loaded: {} pages", document.pages().len());
        Ok(Self {
            document,
            max_rendered_pixels,
        })
    }

    fn page(&self, index: usize) -> Result<PdfPage<'a>, UnitError> {
        let idx = u16::try_from(index).map_err(|_| UnitError::Page {
            page: index + 1,
            detail: "page index out of range".into(),
        })?;
        self.document.pages().get(idx).map_err(|e| UnitError::Page {
            page: index + 1,
            detail: format!("{e:?}"),
        })
    }
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, index: usize) -> Result<String, UnitError> {
        let page = self.page(index)?;
        let text = page.text().map_err(|e| UnitError::Page {
            page: index + 1,
            detail: format!("text layer unavailable: {e:?}"),
        })?;
        Ok(text.all())
    }

    fn render_page(&self, index: usize, dpi: u32) -> Result<DynamicImage, UnitError> {
        let page = self.page(index)?;
        let max = i32::try_from(self.max_rendered_pixels).unwrap_or(i32::MAX);
        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(dpi as f32 / 72.0)
            .set_maximum_width(max)
            .set_maximum_height(max);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| UnitError::Page {
                page: index + 1,
                detail: format!("rasterisation failed: {e:?}"),
            })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}
