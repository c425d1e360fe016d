//! Word-processor extraction for `.docx` and legacy `.doc`.
//!
//! Modern documents are read straight from `word/document.xml`. Body blocks
//! (paragraphs and tables) are emitted in document order and joined with a
//! blank line. Legacy documents are first converted to `.docx` in a private
//! temporary directory, which is removed whatever the outcome.
//!
//! Run formatting maps to Markdown as bold `**t**`, then italic `*t*`, then
//! underline `<u>t</u>`, wrapped around the run's trimmed text so that the
//! spaces between words stay outside the markers. Table cells are plain
//! text: the cell's non-empty paragraphs joined by a single space.

use super::DocumentExtractor;
use crate::config::ExtractionConfig;
use crate::error::Doc2MdError;
use crate::pipeline::legacy::{DocumentConverter, LibreOfficeConverter};
use crate::pipeline::normalize::normalize;
use crate::pipeline::ooxml::{attr_value, open_archive, read_entry};
use crate::pipeline::table::render_table;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP_MAGIC: [u8; 2] = *b"PK";

/// Extractor for `.doc` and `.docx` documents.
#[derive(Debug, Clone)]
pub struct WordExtractor {
    converter: Arc<dyn DocumentConverter>,
}

impl WordExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            converter: Arc::new(LibreOfficeConverter::new(config.libreoffice_cmd.clone())),
        }
    }

    /// Replace the converter used for legacy `.doc` input.
    pub fn with_converter(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.converter = converter;
        self
    }

    fn parse_legacy(&self, path: &Path) -> Result<String, Doc2MdError> {
        let workdir = tempfile::Builder::new()
            .prefix("doc2md-convert-")
            .tempdir()
            .map_err(|e| Doc2MdError::Internal(format!("tempdir: {e}")))?;

        let result = self
            .converter
            .convert(path, workdir.path())
            .and_then(|converted| {
                debug!("Converted {} → {}", path.display(), converted.display());
                parse_docx(&converted)
            });

        let dir = workdir.path().to_path_buf();
        if let Err(e) = workdir.close() {
            warn!("Failed to remove {}: {e}", dir.display());
        }
        result
    }
}

impl DocumentExtractor for WordExtractor {
    fn name(&self) -> &'static str {
        "word"
    }

    fn try_parse(&self, path: &Path) -> Result<String, Doc2MdError> {
        match detect_variant(path)? {
            Variant::Legacy => self.parse_legacy(path),
            Variant::Modern => parse_docx(path),
        }
    }
}

// ── Variant detection ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Legacy,
    Modern,
}

/// OLE compound-file magic wins, then zip magic, then the extension.
fn detect_variant(path: &Path) -> Result<Variant, Doc2MdError> {
    let file = File::open(path).map_err(|e| Doc2MdError::corrupt(path, e))?;
    let mut head = Vec::with_capacity(OLE_MAGIC.len());
    file.take(OLE_MAGIC.len() as u64)
        .read_to_end(&mut head)
        .map_err(|e| Doc2MdError::corrupt(path, e))?;

    if head.starts_with(&OLE_MAGIC) {
        return Ok(Variant::Legacy);
    }
    if head.starts_with(&ZIP_MAGIC) {
        return Ok(Variant::Modern);
    }
    let is_doc = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("doc"));
    Ok(if is_doc { Variant::Legacy } else { Variant::Modern })
}

// ── Modern (.docx) path ────────────────────────────────────────────────────

fn parse_docx(path: &Path) -> Result<String, Doc2MdError> {
    let mut archive = open_archive(path)?;
    let xml = read_entry(&mut archive, "word/document.xml")
        .map_err(|e| Doc2MdError::corrupt(path, format!("word/document.xml: {e}")))?;
    let blocks = parse_document_xml(&xml)
        .map_err(|e| Doc2MdError::corrupt(path, format!("word/document.xml: {e}")))?;
    Ok(render_blocks(&blocks))
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Run {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
}

impl Run {
    fn same_format(&self, other: &Run) -> bool {
        self.bold == other.bold && self.italic == other.italic && self.underline == other.underline
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Paragraph(Vec<Run>),
    Table(Vec<Vec<String>>),
}

/// `w:b`, `w:i` and `w:u` are on unless their `w:val` turns them off.
fn toggle_on(e: &BytesStart<'_>) -> bool {
    match attr_value(e, Some("w"), b"val").or_else(|| attr_value(e, None, b"val")) {
        None => true,
        Some(v) => !matches!(v.as_str(), "0" | "false" | "off" | "none"),
    }
}

/// Parser state for one pass over `document.xml`.
#[derive(Default)]
struct BodyParser {
    blocks: Vec<Block>,
    p_depth: usize,
    runs: Vec<Run>,
    run: Option<Run>,
    in_run_props: bool,
    in_text: bool,
    tbl_depth: usize,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Vec<String>,
}

impl BodyParser {
    fn open(&mut self, e: &BytesStart<'_>) {
        match e.local_name().as_ref() {
            b"p" => {
                if self.p_depth == 0 {
                    self.runs.clear();
                }
                self.p_depth += 1;
            }
            b"r" if self.p_depth > 0 => self.run = Some(Run::default()),
            b"rPr" if self.run.is_some() => self.in_run_props = true,
            b"t" if self.run.is_some() => self.in_text = true,
            b"tbl" => {
                self.tbl_depth += 1;
                if self.tbl_depth == 1 {
                    self.rows.clear();
                }
            }
            b"tr" if self.tbl_depth == 1 => self.row.clear(),
            b"tc" if self.tbl_depth == 1 => self.cell.clear(),
            _ => self.empty(e),
        }
    }

    /// Self-closing elements, and the property/break parts of start tags.
    fn empty(&mut self, e: &BytesStart<'_>) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let name = e.local_name();
        if self.in_run_props {
            match name.as_ref() {
                b"b" => run.bold = toggle_on(e),
                b"i" => run.italic = toggle_on(e),
                b"u" => run.underline = toggle_on(e),
                _ => {}
            }
        } else {
            match name.as_ref() {
                b"tab" => run.text.push('\t'),
                b"br" | b"cr" => run.text.push('\n'),
                _ => {}
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text {
            if let Some(run) = self.run.as_mut() {
                run.text.push_str(text);
            }
        }
    }

    fn close(&mut self, local: &[u8]) {
        match local {
            b"t" => self.in_text = false,
            b"rPr" => self.in_run_props = false,
            b"r" => {
                if let Some(run) = self.run.take() {
                    if !run.text.is_empty() {
                        self.runs.push(run);
                    }
                }
                self.in_run_props = false;
                self.in_text = false;
            }
            b"p" if self.p_depth > 0 => {
                self.p_depth -= 1;
                if self.p_depth == 0 {
                    self.finish_paragraph();
                }
            }
            b"tc" if self.tbl_depth == 1 => {
                let text = std::mem::take(&mut self.cell).join(" ");
                self.row.push(text);
            }
            b"tr" if self.tbl_depth == 1 => {
                let row = std::mem::take(&mut self.row);
                self.rows.push(row);
            }
            b"tbl" if self.tbl_depth > 0 => {
                self.tbl_depth -= 1;
                if self.tbl_depth == 0 {
                    let rows = std::mem::take(&mut self.rows);
                    self.blocks.push(Block::Table(rows));
                }
            }
            _ => {}
        }
    }

    fn finish_paragraph(&mut self) {
        let runs = std::mem::take(&mut self.runs);
        if self.tbl_depth > 0 {
            let text: String = runs.iter().map(|r| r.text.as_str()).collect();
            let text = text.trim();
            if !text.is_empty() {
                self.cell.push(text.to_string());
            }
        } else if runs.iter().any(|r| !r.text.trim().is_empty()) {
            self.blocks.push(Block::Paragraph(runs));
        }
    }
}

fn parse_document_xml(xml: &str) -> Result<Vec<Block>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut parser = BodyParser::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => parser.open(&e),
            Event::Empty(e) => parser.empty(&e),
            Event::Text(e) => parser.text(&e.unescape()?),
            Event::End(e) => parser.close(e.local_name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(parser.blocks)
}

// ── Rendering ──────────────────────────────────────────────────────────────

fn render_blocks(blocks: &[Block]) -> String {
    let rendered: Vec<String> = blocks
        .iter()
        .map(|block| match block {
            Block::Paragraph(runs) => render_paragraph(runs),
            Block::Table(rows) => render_table(rows),
        })
        .filter(|s| !s.trim().is_empty())
        .collect();
    normalize(&rendered.join("\n\n"))
}

fn render_paragraph(runs: &[Run]) -> String {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        match merged.last_mut() {
            Some(last) if last.same_format(run) => last.text.push_str(&run.text),
            _ => merged.push(run.clone()),
        }
    }
    let text: String = merged.iter().map(render_run).collect();
    text.trim().to_string()
}

fn render_run(run: &Run) -> String {
    let core = run.text.trim();
    if core.is_empty() || !(run.bold || run.italic || run.underline) {
        return run.text.clone();
    }
    let lead = &run.text[..run.text.len() - run.text.trim_start().len()];
    let trail = &run.text[run.text.trim_end().len()..];

    let mut s = core.to_string();
    if run.bold {
        s = format!("**{s}**");
    }
    if run.italic {
        s = format!("*{s}*");
    }
    if run.underline {
        s = format!("<u>{s}</u>");
    }
    format!("{lead}{s}{trail}")
}
