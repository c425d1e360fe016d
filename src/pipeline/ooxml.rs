//! Office Open XML container helpers.
//!
//! `.docx` and `.pptx` files are zip archives of XML parts. These helpers
//! open the archive, read a part as text, look up attributes by local name
//! and resolve relationship targets. They know nothing about Word or
//! PowerPoint semantics.

use crate::error::Doc2MdError;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Open a file as a zip archive. Any failure is a whole-document failure.
pub fn open_archive(path: &Path) -> Result<ZipArchive<File>, Doc2MdError> {
    let file = File::open(path).map_err(|e| Doc2MdError::corrupt(path, e))?;
    ZipArchive::new(file).map_err(|e| Doc2MdError::corrupt(path, format!("not a zip container: {e}")))
}

/// Read one archive entry as UTF-8 text (lossy).
pub fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String, ZipError> {
    let mut entry = archive.by_name(name)?;
    let mut buffer = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut buffer).map_err(ZipError::Io)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Names of all entries in the archive, in central-directory order.
pub fn entry_names<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    archive.file_names().map(str::to_string).collect()
}

/// Value of the attribute whose local name is `local` and, when given,
/// whose namespace prefix is `prefix`.
pub fn attr_value(e: &BytesStart<'_>, prefix: Option<&str>, local: &[u8]) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        if attr.key.local_name().as_ref() != local {
            return None;
        }
        let attr_prefix = attr.key.prefix();
        let prefix_ok = match prefix {
            Some(p) => attr_prefix.is_some_and(|ap| ap.as_ref() == p.as_bytes()),
            None => attr_prefix.is_none(),
        };
        if !prefix_ok {
            return None;
        }
        let raw = std::str::from_utf8(&attr.value).ok()?;
        unescape(raw).ok().map(|v| v.into_owned())
    })
}

/// Parse a `.rels` part into an `Id → Target` map.
pub fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut rels = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (
                    attr_value(&e, None, b"Id"),
                    attr_value(&e, None, b"Target"),
                ) {
                    rels.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rels)
}

/// Resolve a relationship target against the directory of its source part.
///
/// `resolve_target("ppt", "slides/slide1.xml") == "ppt/slides/slide1.xml"`;
/// absolute targets (`/ppt/...`) ignore `base_dir`; `..` segments pop.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let joined;
    let full = if let Some(abs) = target.strip_prefix('/') {
        abs
    } else {
        joined = format!("{base_dir}/{target}");
        joined.as_str()
    };
    for seg in full.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    #[test]
    fn reads_entries_from_an_in_memory_archive() {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<w:document/>").unwrap();
            zip.finish().unwrap();
        }
        let mut archive = ZipArchive::new(Cursor::new(buf)).unwrap();
        assert_eq!(entry_names(&archive), vec!["word/document.xml".to_string()]);
        assert_eq!(
            read_entry(&mut archive, "word/document.xml").unwrap(),
            "<w:document/>"
        );
        assert!(matches!(
            read_entry(&mut archive, "missing.xml"),
            Err(ZipError::FileNotFound)
        ));
    }

    #[test]
    fn open_archive_rejects_non_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, b"plain text").unwrap();
        assert!(matches!(
            open_archive(&path),
            Err(Doc2MdError::CorruptDocument { .. })
        ));
    }

    #[test]
    fn attr_value_distinguishes_prefixes() {
        let xml = r#"<p:sldId id="256" r:id="rId2"/>"#;
        let mut reader = Reader::from_str(xml);
        let Event::Empty(e) = reader.read_event().unwrap() else {
            panic!("expected empty element");
        };
        assert_eq!(attr_value(&e, None, b"id").as_deref(), Some("256"));
        assert_eq!(attr_value(&e, Some("r"), b"id").as_deref(), Some("rId2"));
        assert_eq!(attr_value(&e, None, b"missing"), None);
    }

    #[test]
    fn attr_value_decodes_entities() {
        let xml = r#"<Relationship Id="rId7" Target="media/a&amp;b.png" Bad="&bogus;"/>"#;
        let mut reader = Reader::from_str(xml);
        let Event::Empty(e) = reader.read_event().unwrap() else {
            panic!("expected empty element");
        };
        assert_eq!(attr_value(&e, None, b"Target").as_deref(), Some("media/a&b.png"));
        assert_eq!(attr_value(&e, None, b"Bad"), None);
    }

    #[test]
    fn parses_relationships() {
        let xml = r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="t" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId2" Type="t" Target="slides/slide1.xml"/>
</Relationships>"#;
        let rels = parse_relationships(xml).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels["rId2"], "slides/slide1.xml");
    }

    #[test]
    fn resolves_targets() {
        assert_eq!(resolve_target("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("ppt", "/ppt/slides/slide2.xml"), "ppt/slides/slide2.xml");
        assert_eq!(
            resolve_target("ppt/slides", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(resolve_target("ppt", "./slides/slide3.xml"), "ppt/slides/slide3.xml");
    }
}
