//! Extractor selection from an extension token.

use super::{Extractor, PdfExtractor, PresentationExtractor, SpreadsheetExtractor, WordExtractor};
use crate::config::ExtractionConfig;
use crate::error::Doc2MdError;
use crate::format::DocumentFormat;

impl Extractor {
    /// Build the extractor for `format`. Touches neither the filesystem nor
    /// any native library.
    pub fn for_format(format: DocumentFormat, config: &ExtractionConfig) -> Self {
        match format {
            DocumentFormat::Pdf => Extractor::Pdf(PdfExtractor::new(config)),
            DocumentFormat::Doc | DocumentFormat::Docx => Extractor::Word(WordExtractor::new(config)),
            DocumentFormat::Xlsx => Extractor::Spreadsheet(SpreadsheetExtractor::new()),
            DocumentFormat::Pptx => Extractor::Presentation(PresentationExtractor::new()),
        }
    }
}

/// Choose the extractor for an extension token (no leading dot).
///
/// Fails with [`Doc2MdError::UnsupportedFormat`] for anything other than
/// `pdf`, `doc`, `docx`, `pptx` or `xlsx`.
pub fn select(extension: &str, config: &ExtractionConfig) -> Result<Extractor, Doc2MdError> {
    let format = DocumentFormat::from_extension(extension)?;
    Ok(Extractor::for_format(format, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(ext: &str) -> Result<Extractor, Doc2MdError> {
        select(ext, &ExtractionConfig::default())
    }

    #[test]
    fn maps_every_supported_token() {
        assert!(matches!(pick("pdf"), Ok(Extractor::Pdf(_))));
        assert!(matches!(pick("doc"), Ok(Extractor::Word(_))));
        assert!(matches!(pick("docx"), Ok(Extractor::Word(_))));
        assert!(matches!(pick("pptx"), Ok(Extractor::Presentation(_))));
        assert!(matches!(pick("xlsx"), Ok(Extractor::Spreadsheet(_))));
    }

    #[test]
    fn upper_case_tokens_are_accepted() {
        assert!(matches!(pick("XLSX"), Ok(Extractor::Spreadsheet(_))));
    }

    #[test]
    fn rejects_unsupported_tokens() {
        for token in ["", "txt", "ppt", "xls", ".pdf", "odt", "csv"] {
            let err = pick(token).unwrap_err();
            assert!(
                matches!(&err, Doc2MdError::UnsupportedFormat { extension } if extension == token),
                "{token:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn selection_does_not_touch_external_tools() {
        let config = ExtractionConfig::builder()
            .tesseract_cmd("/nonexistent/tesseract")
            .libreoffice_cmd("/nonexistent/soffice")
            .pdfium_lib_path("/nonexistent/libpdfium.so")
            .build()
            .unwrap();
        assert!(select("pdf", &config).is_ok());
        assert!(select("doc", &config).is_ok());
    }
}
