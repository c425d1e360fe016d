//! Configuration types for document extraction.
//!
//! Every knob lives in [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. The config is cheap to clone and is handed to
//! each extractor at selection time; extractors copy out what they need and
//! keep no reference to it.

use crate::error::Doc2MdError;
use crate::format::DocumentFormat;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Upper bound for [`ExtractionConfig::max_rendered_pixels`]; pdfium takes
/// bitmap edges as `i32`.
pub const MAX_RENDERED_PIXELS_LIMIT: u32 = 32_767;

/// Configuration for a document extraction.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_doc2md::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .ocr_dpi(200)
///     .ocr_languages("eng")
///     .concurrency(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.ocr_dpi, 200);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Number of leading pages sampled to decide native vs scanned. Default: 3.
    pub pdf_sample_pages: usize,

    /// Rasterisation DPI for the OCR path. Range: 72–600. Default: 300.
    ///
    /// Tesseract accuracy drops noticeably below 200 DPI on body text.
    pub ocr_dpi: u32,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 7000.
    ///
    /// Caps either dimension, scaling the other proportionally, so a large
    /// page at 300 DPI cannot exhaust memory.
    pub max_rendered_pixels: u32,

    /// Tesseract language spec, `+`-separated. Default: `vie+eng`.
    pub ocr_languages: String,

    /// Tesseract page segmentation mode (`--psm`). Default: 6 (single block of text).
    pub ocr_page_segmentation_mode: u8,

    /// Tesseract engine mode (`--oem`). Default: 3 (whatever is available).
    pub ocr_engine_mode: u8,

    /// Tesseract executable name or path. Default: `tesseract`.
    pub tesseract_cmd: String,

    /// LibreOffice executable used for legacy `.doc` conversion. Default: `libreoffice`.
    pub libreoffice_cmd: String,

    /// Explicit pdfium shared-library path. `None` binds the system library.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Force a format instead of deriving it from the input extension.
    pub format: Option<DocumentFormat>,

    /// Documents extracted concurrently in batch mode. Default: 4.
    pub concurrency: usize,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Receives batch progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pdf_sample_pages: 3,
            ocr_dpi: 300,
            max_rendered_pixels: 7000,
            ocr_languages: "vie+eng".to_string(),
            ocr_page_segmentation_mode: 6,
            ocr_engine_mode: 3,
            tesseract_cmd: "tesseract".to_string(),
            libreoffice_cmd: "libreoffice".to_string(),
            pdfium_lib_path: None,
            format: None,
            concurrency: 4,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("pdf_sample_pages", &self.pdf_sample_pages)
            .field("ocr_dpi", &self.ocr_dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("ocr_languages", &self.ocr_languages)
            .field("ocr_page_segmentation_mode", &self.ocr_page_segmentation_mode)
            .field("ocr_engine_mode", &self.ocr_engine_mode)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("libreoffice_cmd", &self.libreoffice_cmd)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("format", &self.format)
            .field("concurrency", &self.concurrency)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn pdf_sample_pages(mut self, n: usize) -> Self {
        self.config.pdf_sample_pages = n.max(1);
        self
    }

    pub fn ocr_dpi(mut self, dpi: u32) -> Self {
        self.config.ocr_dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.clamp(100, MAX_RENDERED_PIXELS_LIMIT);
        self
    }

    pub fn ocr_languages(mut self, langs: impl Into<String>) -> Self {
        self.config.ocr_languages = langs.into();
        self
    }

    pub fn ocr_page_segmentation_mode(mut self, psm: u8) -> Self {
        self.config.ocr_page_segmentation_mode = psm.min(13);
        self
    }

    pub fn ocr_engine_mode(mut self, oem: u8) -> Self {
        self.config.ocr_engine_mode = oem.min(3);
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn libreoffice_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.config.libreoffice_cmd = cmd.into();
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn format(mut self, format: DocumentFormat) -> Self {
        self.config.format = Some(format);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Doc2MdError> {
        let c = &self.config;
        if c.ocr_dpi < 72 || c.ocr_dpi > 600 {
            return Err(Doc2MdError::InvalidConfig(format!(
                "OCR DPI must be 72–600, got {}",
                c.ocr_dpi
            )));
        }
        if c.concurrency == 0 {
            return Err(Doc2MdError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.ocr_languages.trim().is_empty() {
            return Err(Doc2MdError::InvalidConfig(
                "OCR language spec must not be empty".into(),
            ));
        }
        if c.tesseract_cmd.trim().is_empty() || c.libreoffice_cmd.trim().is_empty() {
            return Err(Doc2MdError::InvalidConfig(
                "External command names must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
