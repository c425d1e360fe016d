//! OCR: turn a rasterised page into text with an external engine.
//!
//! [`TesseractOcr`] shells out to the `tesseract` binary. Each page image is
//! written to its own `NamedTempFile`, which is deleted when `recognize`
//! returns, so at most one page image exists on disk at a time.

use crate::config::ExtractionConfig;
use crate::error::UnitError;
use image::{DynamicImage, ImageFormat};
use std::fmt;
use std::process::Command;
use tracing::debug;

/// Recognises text in a page image.
pub trait OcrEngine: Send + Sync + fmt::Debug {
    /// Run OCR on `image`. `page` is the 1-based page number, used for errors.
    fn recognize(&self, image: &DynamicImage, page: usize) -> Result<String, UnitError>;
}

/// The `tesseract` command-line engine.
///
/// Invoked as `tesseract <page.png> stdout -l <langs> --oem <oem> --psm <psm>`.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: String,
    languages: String,
    engine_mode: u8,
    page_segmentation_mode: u8,
}

impl TesseractOcr {
    pub fn new(command: impl Into<String>, languages: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            languages: languages.into(),
            engine_mode: 3,
            page_segmentation_mode: 6,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            languages: config.ocr_languages.clone(),
            engine_mode: config.ocr_engine_mode,
            page_segmentation_mode: config.ocr_page_segmentation_mode,
        }
    }

    fn args(&self) -> [String; 7] {
        [
            "stdout".to_string(),
            "-l".to_string(),
            self.languages.clone(),
            "--oem".to_string(),
            self.engine_mode.to_string(),
            "--psm".to_string(),
            self.page_segmentation_mode.to_string(),
        ]
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &DynamicImage, page: usize) -> Result<String, UnitError> {
        let ocr_err = |detail: String| UnitError::Ocr { page, detail };

        let png = tempfile::Builder::new()
            .prefix("doc2md-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ocr_err(format!("temp file: {e}")))?;
        image
            .save_with_format(png.path(), ImageFormat::Png)
            .map_err(|e| ocr_err(format!("PNG encode: {e}")))?;

        let output = Command::new(&self.command)
            .arg(png.path())
            .args(self.args())
            .output()
            .map_err(|e| ocr_err(format!("failed to run '{}': {e}", self.command)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ocr_err(format!("{} ({})", output.status, stderr.trim())));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("OCR page {} → {} chars", page, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_page() -> DynamicImage {
        DynamicImage::new_rgb8(4, 4)
    }

    #[test]
    fn from_config_copies_knobs() {
        let config = ExtractionConfig::builder()
            .ocr_languages("eng")
            .ocr_page_segmentation_mode(3)
            .build()
            .unwrap();
        let ocr = TesseractOcr::from_config(&config);
        assert_eq!(
            ocr.args(),
            ["stdout", "-l", "eng", "--oem", "3", "--psm", "3"].map(String::from)
        );
    }

    #[cfg(unix)]
    #[test]
    fn passes_image_then_fixed_arguments() {
        // `echo` prints its argv, which is exactly the invocation.
        let ocr = TesseractOcr::new("echo", "vie+eng");
        let out = ocr.recognize(&blank_page(), 1).unwrap();
        assert!(out.contains(".png stdout -l vie+eng --oem 3 --psm 6"), "got: {out}");
    }

    #[cfg(unix)]
    #[test]
    fn page_image_is_removed_after_recognition() {
        let ocr = TesseractOcr::new("echo", "eng");
        let out = ocr.recognize(&blank_page(), 1).unwrap();
        let image_path = out.split_whitespace().next().unwrap();
        assert!(!std::path::Path::new(image_path).exists());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_ocr_error() {
        let ocr = TesseractOcr::new("false", "eng");
        let err = ocr.recognize(&blank_page(), 7).unwrap_err();
        assert!(matches!(err, UnitError::Ocr { page: 7, .. }));
    }

    #[test]
    fn missing_binary_is_an_ocr_error() {
        let ocr = TesseractOcr::new("doc2md-no-such-ocr-binary", "eng");
        let err = ocr.recognize(&blank_page(), 2).unwrap_err();
        assert!(err.to_string().contains("Page 2"));
    }
}
