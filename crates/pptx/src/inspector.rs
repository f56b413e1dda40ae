//! Reading a written PPTX package back.
//!
//! Used to check that a saved file holds the slides that were assembled,
//! in the order they were assembled.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// What a package contains, as far as slide order and text go.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageSummary {
    /// Slide width and height in EMUs.
    pub slide_size: (i64, i64),

    /// Slides in presentation order.
    pub slides: Vec<SlideSummary>,
}

/// One slide of an inspected package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideSummary {
    /// Part name inside the archive, e.g. `ppt/slides/slide1.xml`.
    pub part: String,

    /// Number of shapes on the slide.
    pub shape_count: usize,

    /// Non-empty paragraph text, in reading order.
    pub texts: Vec<String>,
}

/// Inspector for PPTX (Office Open XML) files.
#[derive(Debug, Clone, Default)]
pub struct PptxInspector;

impl PptxInspector {
    /// Create a new PPTX inspector.
    pub fn new() -> Self {
        Self
    }

    /// Inspect a PPTX file on disk.
    pub fn inspect_file(&self, path: &Path) -> Result<PackageSummary> {
        let file = File::open(path)?;
        self.inspect(BufReader::new(file))
    }

    /// Inspect a PPTX package from a reader.
    pub fn inspect<R: Read + Seek>(&self, reader: R) -> Result<PackageSummary> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let presentation = read_file_from_archive(&mut archive, "ppt/presentation.xml")?;
        let (slide_size, slide_rel_ids) = parse_presentation(&presentation)?;

        let rels = read_file_from_archive(&mut archive, "ppt/_rels/presentation.xml.rels")?;
        let targets = parse_relationships(&rels)?;

        let mut slides = Vec::with_capacity(slide_rel_ids.len());
        for rel_id in slide_rel_ids {
            let target = targets.get(&rel_id).ok_or_else(|| {
                Error::XmlError(format!("Slide relationship '{}' has no target", rel_id))
            })?;
            let part = match target.strip_prefix('/') {
                Some(absolute) => absolute.to_string(),
                None => format!("ppt/{}", target),
            };
            let content = read_file_from_archive(&mut archive, &part)?;
            slides.push(parse_slide(part, &content)?);
        }

        Ok(PackageSummary { slide_size, slides })
    }

    /// Inspect a written file and check it holds exactly `expected` slides.
    pub fn verify(&self, path: &Path, expected: usize) -> Result<PackageSummary> {
        let summary = self.inspect_file(path)?;
        if summary.slides.len() != expected {
            return Err(Error::XmlError(format!(
                "package holds {} slide(s), expected {}",
                summary.slides.len(),
                expected
            )));
        }
        Ok(summary)
    }
}

/// Slide size and slide relationship ids, in `sldIdLst` order.
fn parse_presentation(xml: &str) -> Result<((i64, i64), Vec<String>)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut size = (0, 0);
    let mut rel_ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                match local_name(e.name().as_ref()) {
                    b"sldSz" => {
                        size = (
                            attr_value(e, b"cx").and_then(|v| v.parse().ok()).unwrap_or(0),
                            attr_value(e, b"cy").and_then(|v| v.parse().ok()).unwrap_or(0),
                        );
                    }
                    b"sldId" => {
                        if let Some(id) = attr_value(e, b"r:id") {
                            rel_ids.push(id);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation.xml: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok((size, rel_ids))
}

/// Map of relationship id to target.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr_value(e, b"Id"), attr_value(e, b"Target"))
                {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(targets)
}

/// Count shapes and collect paragraph text from slide XML.
fn parse_slide(part: String, xml: &str) -> Result<SlideSummary> {
    let mut reader = Reader::from_str(xml);

    let mut summary = SlideSummary {
        part,
        ..SlideSummary::default()
    };
    let mut in_text = false;
    let mut paragraph = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => summary.shape_count += 1,
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e.unescape().unwrap_or_default();
                paragraph.push_str(&text);
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => {
                    if !paragraph.trim().is_empty() {
                        summary.texts.push(std::mem::take(&mut paragraph));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing {}: {}",
                    summary.part, e
                )));
            }
            _ => {}
        }
    }

    Ok(summary)
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Value of the attribute with exactly this (possibly prefixed) name.
fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
