//! Base template loading.
//!
//! A template is the set of package parts every generated deck starts from:
//! masters, layouts, theme and presentation properties. Slides that already
//! exist in a template file are dropped on load.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use thiserror::Error;
use zip::ZipArchive;

use super::builtin;
use crate::domain::deck::SlideCanvas;

pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub(crate) const PRESENTATION_PART: &str = "ppt/presentation.xml";
pub(crate) const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

pub(crate) const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

/// Errors raised while loading a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to open template archive: {0}")]
    Archive(String),

    #[error("template is missing required part {0}")]
    MissingPart(String),

    #[error("template part {part} is malformed: {message}")]
    Xml { part: String, message: String },

    #[error("template defines no slide layouts")]
    NoLayouts,

    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

impl TemplateError {
    fn xml(part: &str, message: impl Into<String>) -> Self {
        Self::Xml {
            part: part.to_string(),
            message: message.into(),
        }
    }
}

/// A loaded base template.
#[derive(Debug, Clone)]
pub struct PptxTemplate {
    parts: BTreeMap<String, Vec<u8>>,
    canvas: SlideCanvas,
    /// Layout part names in master order.
    layouts: Vec<String>,
}

impl PptxTemplate {
    /// Built-in 10in x 7.5in template with a single "Title and Content" layout.
    pub fn builtin() -> Self {
        Self {
            parts: builtin::parts(),
            canvas: SlideCanvas::standard(),
            layouts: vec![builtin::LAYOUT_PART.to_string()],
        }
    }

    /// Loads a `.pptx` file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Loads a template from the bytes of a `.pptx` package.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TemplateError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| TemplateError::Archive(e.to_string()))?;
        let parts = read_parts(&mut archive)?;
        Self::from_parts(parts)
    }

    pub(crate) fn from_parts(mut parts: BTreeMap<String, Vec<u8>>) -> Result<Self, TemplateError> {
        parts.retain(|name, _| !is_slide_owned_part(name));

        for required in [CONTENT_TYPES_PART, PRESENTATION_PART, PRESENTATION_RELS_PART] {
            if !parts.contains_key(required) {
                return Err(TemplateError::MissingPart(required.to_string()));
            }
        }

        let canvas = read_canvas(part_text(&parts, PRESENTATION_PART)?)?;
        let layouts = read_layouts(&parts)?;
        if layouts.is_empty() {
            return Err(TemplateError::NoLayouts);
        }

        Ok(Self {
            parts,
            canvas,
            layouts,
        })
    }

    pub fn canvas(&self) -> SlideCanvas {
        self.canvas
    }

    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    /// Part name of the layout at `index`, in master order.
    pub fn layout_part(&self, index: usize) -> Option<&str> {
        self.layouts.get(index).map(String::as_str)
    }

    pub(crate) fn parts(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.parts
    }
}

/// Parts that belong to individual slides and are dropped from templates.
pub(crate) fn is_slide_owned_part(name: &str) -> bool {
    name.starts_with("ppt/slides/") || name.starts_with("ppt/notesSlides/")
}

fn read_parts<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<BTreeMap<String, Vec<u8>>, TemplateError> {
    let mut parts = BTreeMap::new();

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| TemplateError::Archive(e.to_string()))?;
        if file.is_dir() {
            continue;
        }
        let mut content = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut content)?;
        parts.insert(file.name().to_string(), content);
    }

    Ok(parts)
}

fn part_text<'a>(
    parts: &'a BTreeMap<String, Vec<u8>>,
    name: &str,
) -> Result<&'a str, TemplateError> {
    let bytes = parts
        .get(name)
        .ok_or_else(|| TemplateError::MissingPart(name.to_string()))?;
    std::str::from_utf8(bytes).map_err(|e| TemplateError::xml(name, e.to_string()))
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

fn read_canvas(xml: &str) -> Result<SlideCanvas, TemplateError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldSz" =>
            {
                let mut cx = None;
                let mut cy = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).parse::<i64>().ok();
                    match attr.key.as_ref() {
                        b"cx" => cx = value,
                        b"cy" => cy = value,
                        _ => {}
                    }
                }
                return match (cx, cy) {
                    (Some(cx), Some(cy)) => Ok(SlideCanvas::new(cx, cy)),
                    _ => Err(TemplateError::xml(PRESENTATION_PART, "sldSz lacks cx/cy")),
                };
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TemplateError::xml(PRESENTATION_PART, e.to_string())),
            _ => {}
        }
    }

    // Absent sldSz means the application default.
    Ok(SlideCanvas::standard())
}

/// A `Relationship` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

pub(crate) fn read_relationships(
    xml: &str,
    part: &str,
) -> Result<Vec<Relationship>, TemplateError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel = Relationship::default();
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Id" => rel.id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        _ => {}
                    }
                }
                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TemplateError::xml(part, e.to_string())),
            _ => {}
        }
    }

    Ok(rels)
}

/// Relationships part for `part`, e.g. `ppt/_rels/presentation.xml.rels`.
pub(crate) fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolves a relationship target against the directory of its source part.
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Layout part names of the first slide master, in `sldLayoutIdLst` order.
fn read_layouts(parts: &BTreeMap<String, Vec<u8>>) -> Result<Vec<String>, TemplateError> {
    let pres_rels = read_relationships(
        part_text(parts, PRESENTATION_RELS_PART)?,
        PRESENTATION_RELS_PART,
    )?;
    let master = match pres_rels.iter().find(|r| r.rel_type == REL_SLIDE_MASTER) {
        Some(rel) => resolve_target(PRESENTATION_PART, &rel.target),
        None => return Ok(Vec::new()),
    };

    let master_rels_part = rels_part_for(&master);
    let master_rels = read_relationships(part_text(parts, &master_rels_part)?, &master_rels_part)?;

    let mut reader = Reader::from_str(part_text(parts, &master)?);
    reader.trim_text(true);
    let mut layouts = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldLayoutId" =>
            {
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref() == b"r:id")
                    .map(|a| String::from_utf8_lossy(&a.value).to_string());
                let Some(rel_id) = rel_id else { continue };

                if let Some(rel) = master_rels.iter().find(|r| r.id == rel_id) {
                    let layout = resolve_target(&master, &rel.target);
                    if parts.contains_key(&layout) {
                        layouts.push(layout);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TemplateError::xml(&master, e.to_string())),
            _ => {}
        }
    }

    Ok(layouts)
}
