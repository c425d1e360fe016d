//! End-to-end tests against the real external tools.
//!
//! These need the pdfium shared library, `tesseract` and `libreoffice`, so
//! they are gated behind the `E2E_ENABLED` environment variable and do not
//! run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test e2e -- --nocapture
//!
//! A remote document can be exercised too:
//!   DOC2MD_E2E_URL=https://example.com/sample.pdf E2E_ENABLED=1 cargo test --test e2e remote

mod common;

use common::{paragraph, write_docx};
use edgequake_doc2md::{extract, inspect_pdf, ExtractionConfig, PdfKind, PAGE_BREAK};
use std::path::{Path, PathBuf};
use std::process::Command;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set and every named tool runs.
macro_rules! e2e_skip_unless_ready {
    ($($tool:expr),* $(,)?) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        $(
            if !tool_available($tool) {
                println!("SKIP — {} not found on PATH", $tool);
                return;
            }
        )*
    }};
}

fn tool_available(cmd: &str) -> bool {
    Command::new(cmd)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn config() -> ExtractionConfig {
    let mut builder = ExtractionConfig::builder().ocr_languages("eng");
    if let Ok(lib) = std::env::var("PDFIUM_LIB_PATH") {
        builder = builder.pdfium_lib_path(PathBuf::from(lib));
    }
    builder.build().unwrap()
}

/// A minimal PDF with one page per entry; `None` is a page with no text.
fn write_pdf(dir: &Path, name: &str, pages: &[Option<&str>]) -> PathBuf {
    let n = pages.len();
    // 1: catalog, 2: pages, 3: font, then (page, content) pairs
    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = (0..n).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
    objects.push(format!("<< /Type /Pages /Kids [{}] /Count {n} >>", kids.join(" ")));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());
    for (i, text) in pages.iter().enumerate() {
        let content_id = 5 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        let stream = match text {
            Some(t) => format!("BT /F1 24 Tf 72 700 Td ({t}) Tj ET"),
            None => String::new(),
        };
        objects.push(format!("<< /Length {} >>\nstream\n{stream}\nendstream", stream.len()));
    }

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }
    let xref = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for off in offsets {
        pdf.push_str(&format!("{off:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        objects.len() + 1
    ));

    let path = dir.join(name);
    std::fs::write(&path, pdf).unwrap();
    path
}

fn assert_markdown_quality(md: &str, context: &str) {
    assert!(!md.trim().is_empty(), "[{context}] Markdown is empty");
    assert_eq!(md, md.trim(), "[{context}] Markdown must be trimmed");
    assert!(!md.contains('\r'), "[{context}] Markdown contains CR");
    assert!(
        !md.contains("\n\n\n"),
        "[{context}] Markdown has more than one consecutive blank line"
    );
}

// ── PDF ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn native_pdf_uses_text_layer() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "native.pdf", &[Some("Hello native"), None, Some("Second page")]);
    let cfg = config();

    let info = inspect_pdf(path.to_string_lossy(), &cfg).await.unwrap();
    assert_eq!(info.page_count, 3);
    assert_eq!(info.kind, PdfKind::Native);

    let output = extract(path.to_string_lossy(), &cfg).await.unwrap();
    println!("{}", output.markdown);
    assert_markdown_quality(&output.markdown, "native");
    assert!(output.markdown.contains("Hello native"));
    assert!(output.markdown.contains("Second page"));
    assert_eq!(output.markdown.matches(PAGE_BREAK.trim()).count(), 1);
}

#[tokio::test]
async fn textless_pdf_is_classified_scanned_and_ocrd() {
    e2e_skip_unless_ready!("tesseract");
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "blank.pdf", &[None, None]);
    let cfg = config();

    let info = inspect_pdf(path.to_string_lossy(), &cfg).await.unwrap();
    assert_eq!(info.kind, PdfKind::Scanned);

    // Blank pages OCR to nothing; the call must still succeed.
    let output = extract(path.to_string_lossy(), &cfg).await.unwrap();
    assert!(output.markdown.trim().is_empty(), "got: {:?}", output.markdown);
}

// ── Legacy Word ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn legacy_doc_round_trips_through_libreoffice() {
    e2e_skip_unless_ready!("libreoffice");
    let dir = tempfile::tempdir().unwrap();
    let docx = write_docx(dir.path(), "memo.docx", &paragraph(&["Legacy memo body"]));

    // Produce a real .doc from the generated .docx.
    let doc_dir = dir.path().join("doc");
    std::fs::create_dir_all(&doc_dir).unwrap();
    let status = Command::new("libreoffice")
        .args(["--headless", "--convert-to", "doc", "--outdir"])
        .arg(&doc_dir)
        .arg(&docx)
        .status()
        .unwrap();
    assert!(status.success());
    let doc = doc_dir.join("memo.doc");
    assert!(doc.exists(), "libreoffice did not produce {}", doc.display());

    let output = extract(doc.to_string_lossy(), &config()).await.unwrap();
    println!("{}", output.markdown);
    assert_markdown_quality(&output.markdown, "doc");
    assert!(output.markdown.contains("Legacy memo body"));
    assert!(doc.exists(), "input must be left in place");
}

// ── Remote input ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn remote_document_is_downloaded_and_extracted() {
    e2e_skip_unless_ready!();
    let Ok(url) = std::env::var("DOC2MD_E2E_URL") else {
        println!("SKIP — set DOC2MD_E2E_URL to a reachable document");
        return;
    };

    let output = extract(&url, &config()).await.unwrap();
    println!("{} → {} chars", url, output.stats.output_chars);
    assert!(output.stats.input_bytes > 0);
}
