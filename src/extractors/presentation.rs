//! Presentation extraction for `.pptx` decks.
//!
//! Slides are visited in presentation order: the slide-id list in
//! `ppt/presentation.xml` resolved through its relationships part. When that
//! part is missing or unreadable, `ppt/slides/slideN.xml` entries are used in
//! numeric order instead.
//!
//! Every top-level child of a slide's shape tree is parsed on its own, so one
//! malformed shape (a bad entity, say) costs only that shape's text. Each
//! slide yields a `## Slide {n}` heading even when it has no text.

use super::DocumentExtractor;
use crate::error::{Doc2MdError, UnitError};
use crate::pipeline::normalize::normalize;
use crate::pipeline::ooxml::{attr_value, entry_names, open_archive, parse_relationships, read_entry, resolve_target};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Extractor for `.pptx` decks.
#[derive(Debug, Clone, Default)]
pub struct PresentationExtractor;

impl PresentationExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for PresentationExtractor {
    fn name(&self) -> &'static str {
        "presentation"
    }

    fn try_parse(&self, path: &Path) -> Result<String, Doc2MdError> {
        let mut archive = open_archive(path)?;
        let parts = slide_parts(&mut archive);
        debug!("Deck has {} slides", parts.len());

        let sections: Vec<String> = parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let slide = i + 1;
                let xml = read_entry(&mut archive, part).map_err(|e| UnitError::Slide {
                    slide,
                    detail: format!("{part}: {e}"),
                });
                slide_section(slide, xml)
            })
            .collect();
        Ok(normalize(&sections.join("\n\n")))
    }
}

// ── Slide order ────────────────────────────────────────────────────────────

/// Slide part names in presentation order.
fn slide_parts<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Vec<String> {
    match ordered_slide_parts(archive) {
        Ok(parts) if !parts.is_empty() => parts,
        Ok(_) => numbered_slide_parts(&entry_names(archive)),
        Err(e) => {
            debug!("Presentation order unavailable ({e}); using slide numbering");
            numbered_slide_parts(&entry_names(archive))
        }
    }
}

fn ordered_slide_parts<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>, String> {
    let presentation = read_entry(archive, "ppt/presentation.xml").map_err(|e| e.to_string())?;
    let rels_xml = read_entry(archive, "ppt/_rels/presentation.xml.rels").map_err(|e| e.to_string())?;
    let rels = parse_relationships(&rels_xml).map_err(|e| e.to_string())?;

    let mut reader = Reader::from_str(&presentation);
    let mut parts = Vec::new();
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                let target = attr_value(&e, Some("r"), b"id").and_then(|id| rels.get(&id));
                match target {
                    Some(target) => parts.push(resolve_target("ppt", target)),
                    None => return Err("slide id without a relationship target".into()),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(parts)
}

/// `ppt/slides/slideN.xml` entries sorted by `N`.
fn numbered_slide_parts(names: &[String]) -> Vec<String> {
    let mut numbered: Vec<(usize, &String)> = names
        .iter()
        .filter_map(|name| {
            let n = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse::<usize>()
                .ok()?;
            Some((n, name))
        })
        .collect();
    numbered.sort_by_key(|(n, _)| *n);
    numbered.into_iter().map(|(_, name)| name.clone()).collect()
}

// ── Slide content ──────────────────────────────────────────────────────────

fn slide_section(slide: usize, xml: Result<String, UnitError>) -> String {
    let texts = xml.and_then(|xml| shape_texts(slide, &xml)).unwrap_or_else(|e| {
        warn!("{e}");
        Vec::new()
    });
    format!("## Slide {slide}\n{}", texts.join("\n"))
}

/// Text of every shape on the slide that has some, in tree order.
fn shape_texts(slide: usize, xml: &str) -> Result<Vec<String>, UnitError> {
    let fragments = split_shapes(xml).map_err(|e| UnitError::Slide {
        slide,
        detail: e.to_string(),
    })?;
    let mut texts = Vec::new();
    for (i, fragment) in fragments.iter().enumerate() {
        match shape_text(fragment) {
            Ok(text) if !text.is_empty() => texts.push(text),
            Ok(_) => {}
            Err(e) => warn!(
                "{}",
                UnitError::Shape {
                    slide,
                    shape: i + 1,
                    detail: e.to_string(),
                }
            ),
        }
    }
    Ok(texts)
}

/// Source slices of the top-level children of the first `spTree`.
///
/// Group and shape properties of the tree itself carry no text and are left
/// out. Entities are not decoded here, so a bad entity fails only the shape
/// that holds it, later in [`shape_text`].
fn split_shapes(xml: &str) -> Result<Vec<&str>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut shape_start: Option<usize> = None;

    loop {
        let before = reader.buffer_position();
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let local = e.local_name();
                match tree_depth {
                    None if local.as_ref() == b"spTree" => tree_depth = Some(depth),
                    Some(t) if depth == t + 1 && !is_tree_property(local.as_ref()) => {
                        shape_start = Some(before);
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                if let (Some(t), Some(start)) = (tree_depth, shape_start) {
                    if depth == t + 1 {
                        fragments.push(&xml[start..reader.buffer_position()]);
                        shape_start = None;
                    }
                }
                if tree_depth == Some(depth) {
                    break;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(fragments)
}

fn is_tree_property(local: &[u8]) -> bool {
    matches!(local, b"nvGrpSpPr" | b"grpSpPr" | b"extLst")
}

/// A shape's paragraphs joined by newlines, trimmed.
fn shape_text(fragment: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(fragment);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"br" => {
                    if let Some(p) = current.as_mut() {
                        p.push('\n');
                    }
                }
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(e) => {
                let text = e.unescape()?;
                if in_text {
                    if let Some(p) = current.as_mut() {
                        p.push_str(&text);
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(p) = current.take() {
                        paragraphs.push(p);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs.join("\n").trim().to_string())
}
