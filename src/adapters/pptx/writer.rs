//! PresentationML package writer.
//!
//! Copies the template parts, rewrites the three parts that enumerate slides
//! (content types, presentation relationships and `presentation.xml`) and
//! appends one slide part per rendered slide.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::{Cursor, Write};
use std::sync::Arc;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::slide_xml::{slide_xml, xml_text};
use super::template::{
    local_name, rels_part_for, PptxTemplate, CONTENT_TYPES_PART, PRESENTATION_PART,
    PRESENTATION_RELS_PART, REL_SLIDE,
};
use crate::domain::deck::{AssembledDocument, SlideCanvas};
use crate::ports::{DeckWriteError, DeckWriter};

pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

/// First id PowerPoint accepts in `p:sldIdLst`.
const FIRST_SLIDE_ID: usize = 256;

/// Writes assembled documents on top of a shared template.
#[derive(Debug, Clone)]
pub struct PptxDeckWriter {
    template: Arc<PptxTemplate>,
    layout_index: usize,
}

impl PptxDeckWriter {
    /// Fails when the template has no layout at `layout_index`.
    pub fn new(template: Arc<PptxTemplate>, layout_index: usize) -> Result<Self, DeckWriteError> {
        if template.layout_part(layout_index).is_none() {
            return Err(DeckWriteError::MissingLayout {
                index: layout_index,
                available: template.layout_count(),
            });
        }
        Ok(Self {
            template,
            layout_index,
        })
    }

    fn slide_rels_xml(&self, layout_part: &str) -> String {
        let target = match layout_part.strip_prefix("ppt/") {
            Some(inside_ppt) => format!("../{}", inside_ppt),
            None => format!("/{}", layout_part),
        };
        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
                "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
                "<Relationship Id=\"rId1\" Type=\"{}\" Target=\"{}\"/>",
                "</Relationships>"
            ),
            REL_SLIDE_LAYOUT,
            xml_text(&target)
        )
    }
}

impl DeckWriter for PptxDeckWriter {
    fn canvas(&self) -> SlideCanvas {
        self.template.canvas()
    }

    fn layout_index(&self) -> usize {
        self.layout_index
    }

    fn content_type(&self) -> &'static str {
        PPTX_CONTENT_TYPE
    }

    fn write(&self, document: &AssembledDocument) -> Result<Vec<u8>, DeckWriteError> {
        let layout_index = document.layout_index();
        let layout_part = self.template.layout_part(layout_index).ok_or(
            DeckWriteError::MissingLayout {
                index: layout_index,
                available: self.template.layout_count(),
            },
        )?;
        let slide_count = document.slide_count();
        let parts = self.template.parts();

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        // The content types part goes first in the archive.
        let content_types = rewrite_content_types(part_str(parts, CONTENT_TYPES_PART)?, slide_count)?;
        add_part(&mut zip, options, CONTENT_TYPES_PART, content_types.as_bytes())?;

        for (name, data) in parts {
            let rewritten = match name.as_str() {
                CONTENT_TYPES_PART => continue,
                PRESENTATION_RELS_PART => {
                    rewrite_presentation_rels(part_str(parts, name)?, slide_count)?.into_bytes()
                }
                PRESENTATION_PART => {
                    rewrite_presentation(part_str(parts, name)?, slide_count)?.into_bytes()
                }
                _ => {
                    add_part(&mut zip, options, name, data)?;
                    continue;
                }
            };
            add_part(&mut zip, options, name, &rewritten)?;
        }

        let slide_rels = self.slide_rels_xml(layout_part);
        for (i, slide) in document.slides().iter().enumerate() {
            let part = slide_part(i + 1);
            add_part(&mut zip, options, &part, slide_xml(slide).as_bytes())?;
            add_part(&mut zip, options, &rels_part_for(&part), slide_rels.as_bytes())?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| DeckWriteError::Archive(e.to_string()))?;

        tracing::debug!(slides = slide_count, layout = layout_part, "Deck package written");

        Ok(cursor.into_inner())
    }
}

fn slide_part(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

fn slide_rel_id(number: usize) -> String {
    format!("rIdSlide{}", number)
}

fn add_part<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    name: &str,
    data: &[u8],
) -> Result<(), DeckWriteError> {
    zip.start_file(name, options)
        .map_err(|e| DeckWriteError::Archive(e.to_string()))?;
    zip.write_all(data)?;
    Ok(())
}

fn part_str<'a>(
    parts: &'a std::collections::BTreeMap<String, Vec<u8>>,
    name: &str,
) -> Result<&'a str, DeckWriteError> {
    let bytes = parts
        .get(name)
        .ok_or_else(|| DeckWriteError::MalformedPart(name.to_string(), "missing".to_string()))?;
    std::str::from_utf8(bytes).map_err(|e| DeckWriteError::MalformedPart(name.to_string(), e.to_string()))
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

fn write_event<'a>(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    event: Event<'a>,
    part: &str,
) -> Result<(), DeckWriteError> {
    writer
        .write_event(event)
        .map_err(|e| DeckWriteError::MalformedPart(part.to_string(), e.to_string()))
}

fn finish(writer: Writer<Cursor<Vec<u8>>>, part: &str) -> Result<String, DeckWriteError> {
    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| DeckWriteError::MalformedPart(part.to_string(), e.to_string()))
}

/// Streams `xml` through `edit`, which may drop or replace each event.
///
/// `edit` receives every event and the writer; returning `false` drops the
/// event.
fn rewrite<F>(xml: &str, part: &str, mut edit: F) -> Result<String, DeckWriteError>
where
    F: FnMut(&Event<'_>, &mut Writer<Cursor<Vec<u8>>>) -> Result<bool, DeckWriteError>,
{
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DeckWriteError::MalformedPart(part.to_string(), e.to_string()))?;
        if matches!(event, Event::Eof) {
            break;
        }
        if edit(&event, &mut writer)? {
            write_event(&mut writer, event, part)?;
        }
    }

    finish(writer, part)
}

/// Drops slide overrides from the template and declares the new slides.
fn rewrite_content_types(xml: &str, slide_count: usize) -> Result<String, DeckWriteError> {
    let part = CONTENT_TYPES_PART;
    rewrite(xml, part, |event, writer| match event {
        Event::Empty(e) if local_name(e.name().as_ref()) == b"Override" => {
            let name = attr_value(e, b"PartName").unwrap_or_default();
            Ok(!(name.starts_with("/ppt/slides/") || name.starts_with("/ppt/notesSlides/")))
        }
        Event::End(e) if local_name(e.name().as_ref()) == b"Types" => {
            for number in 1..=slide_count {
                let mut el = BytesStart::new("Override");
                let part_name = format!("/{}", slide_part(number));
                el.push_attribute(("PartName", part_name.as_str()));
                el.push_attribute(("ContentType", SLIDE_CONTENT_TYPE));
                write_event(writer, Event::Empty(el), part)?;
            }
            Ok(true)
        }
        _ => Ok(true),
    })
}

/// Drops slide relationships from the template and links the new slides.
fn rewrite_presentation_rels(xml: &str, slide_count: usize) -> Result<String, DeckWriteError> {
    let part = PRESENTATION_RELS_PART;
    rewrite(xml, part, |event, writer| match event {
        Event::Empty(e) if local_name(e.name().as_ref()) == b"Relationship" => {
            Ok(attr_value(e, b"Type").as_deref() != Some(REL_SLIDE))
        }
        Event::End(e) if local_name(e.name().as_ref()) == b"Relationships" => {
            for number in 1..=slide_count {
                let mut el = BytesStart::new("Relationship");
                let id = slide_rel_id(number);
                let target = format!("slides/slide{}.xml", number);
                el.push_attribute(("Id", id.as_str()));
                el.push_attribute(("Type", REL_SLIDE));
                el.push_attribute(("Target", target.as_str()));
                write_event(writer, Event::Empty(el), part)?;
            }
            Ok(true)
        }
        _ => Ok(true),
    })
}

/// Replaces `p:sldIdLst` with one entry per new slide, placed before
/// `p:sldSz` (or `p:notesSz` when the size is absent).
fn rewrite_presentation(xml: &str, slide_count: usize) -> Result<String, DeckWriteError> {
    let part = PRESENTATION_PART;
    let mut skip_depth = 0usize;
    let mut inserted = false;

    let insert_list = |writer: &mut Writer<Cursor<Vec<u8>>>| -> Result<(), DeckWriteError> {
        if slide_count == 0 {
            return Ok(());
        }
        write_event(writer, Event::Start(BytesStart::new("p:sldIdLst")), part)?;
        for number in 1..=slide_count {
            let mut el = BytesStart::new("p:sldId");
            let id = (FIRST_SLIDE_ID + number - 1).to_string();
            let rel_id = slide_rel_id(number);
            el.push_attribute(("id", id.as_str()));
            el.push_attribute(("r:id", rel_id.as_str()));
            write_event(writer, Event::Empty(el), part)?;
        }
        write_event(writer, Event::End(BytesEnd::new("p:sldIdLst")), part)
    };

    rewrite(xml, part, |event, writer| {
        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                _ => {}
            }
            return Ok(false);
        }

        match event {
            Event::Start(e) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                skip_depth = 1;
                Ok(false)
            }
            Event::Empty(e) if local_name(e.name().as_ref()) == b"sldIdLst" => Ok(false),
            Event::Empty(e) | Event::Start(e)
                if !inserted && matches!(local_name(e.name().as_ref()), b"sldSz" | b"notesSz") =>
            {
                inserted = true;
                insert_list(writer)?;
                Ok(true)
            }
            _ => Ok(true),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::{
        LayoutEngine, LayoutStyle, TableContent, TableSlideContent, TextSlideContent,
    };
    use std::io::Read;
    use zip::ZipArchive;

    fn writer() -> PptxDeckWriter {
        PptxDeckWriter::new(Arc::new(PptxTemplate::builtin()), 0).unwrap()
    }

    fn document(slides: usize) -> AssembledDocument {
        let writer = writer();
        let engine = LayoutEngine::new(writer.canvas(), LayoutStyle::default());
        let mut doc = AssembledDocument::new(writer.canvas(), 0);
        for i in 0..slides {
            doc.push(engine.render_text(&TextSlideContent {
                title: format!("Slide {}", i + 1),
                body: "Body".to_string(),
            }));
        }
        doc
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        text
    }

    fn part_names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn rejects_out_of_range_layout() {
        let err = PptxDeckWriter::new(Arc::new(PptxTemplate::builtin()), 3).unwrap_err();
        assert!(matches!(err, DeckWriteError::MissingLayout { index: 3, available: 1 }));
    }

    #[test]
    fn reports_template_metadata() {
        let writer = writer();
        assert_eq!(writer.canvas(), SlideCanvas::standard());
        assert_eq!(writer.layout_index(), 0);
        assert_eq!(writer.content_type(), PPTX_CONTENT_TYPE);
    }

    #[test]
    fn writes_one_part_per_slide_in_order() {
        let bytes = writer().write(&document(3)).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), CONTENT_TYPES_PART);

        let names = part_names(&bytes);
        for n in 1..=3 {
            assert!(names.contains(&format!("ppt/slides/slide{}.xml", n)));
            assert!(names.contains(&format!("ppt/slides/_rels/slide{}.xml.rels", n)));
        }
        assert!(read_part(&bytes, "ppt/slides/slide2.xml").contains("<a:t>Slide 2</a:t>"));
    }

    #[test]
    fn noncharacters_in_content_do_not_corrupt_slide_part() {
        let writer = writer();
        let engine = LayoutEngine::new(writer.canvas(), LayoutStyle::default());
        let mut doc = AssembledDocument::new(writer.canvas(), 0);
        doc.push(engine.render_text(&TextSlideContent {
            title: "Bad\u{FFFF}title".to_string(),
            body: "Line\u{FFFE}".to_string(),
        }));

        let slide = read_part(&writer.write(&doc).unwrap(), "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:t>Badtitle</a:t>"));

        let mut reader = Reader::from_str(&slide);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Err(e) => panic!("slide1.xml is malformed: {e}"),
                _ => {}
            }
        }
    }

    #[test]
    fn presentation_lists_slides_before_slide_size() {
        let bytes = writer().write(&document(2)).unwrap();
        let pres = read_part(&bytes, PRESENTATION_PART);

        let list = pres.find("<p:sldIdLst>").unwrap();
        let size = pres.find("<p:sldSz").unwrap();
        assert!(list < size);
        assert!(pres.contains("<p:sldId id=\"256\" r:id=\"rIdSlide1\"/>"));
        assert!(pres.contains("<p:sldId id=\"257\" r:id=\"rIdSlide2\"/>"));
    }

    #[test]
    fn relationships_and_content_types_cover_new_slides() {
        let bytes = writer().write(&document(2)).unwrap();

        let rels = read_part(&bytes, PRESENTATION_RELS_PART);
        assert!(rels.contains("Id=\"rIdSlide2\""));
        assert!(rels.contains("Target=\"slides/slide2.xml\""));
        assert!(rels.contains("slideMasters/slideMaster1.xml"));

        let types = read_part(&bytes, CONTENT_TYPES_PART);
        assert_eq!(types.matches(SLIDE_CONTENT_TYPE).count(), 2);

        let slide_rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(slide_rels.contains("Target=\"../slideLayouts/slideLayout1.xml\""));
    }

    #[test]
    fn empty_document_has_no_slide_list() {
        let bytes = writer().write(&document(0)).unwrap();
        let pres = read_part(&bytes, PRESENTATION_PART);

        assert!(!pres.contains("sldIdLst"));
        assert!(!part_names(&bytes).iter().any(|n| n.starts_with("ppt/slides/")));
    }

    #[test]
    fn written_deck_reloads_as_template_without_slides() {
        let bytes = writer().write(&document(2)).unwrap();

        let reloaded = PptxTemplate::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.canvas(), SlideCanvas::standard());

        let second = PptxDeckWriter::new(Arc::new(reloaded), 0)
            .unwrap()
            .write(&document(1))
            .unwrap();
        let pres = read_part(&second, PRESENTATION_PART);
        assert_eq!(pres.matches("<p:sldId ").count(), 1);

        let types = read_part(&second, CONTENT_TYPES_PART);
        assert_eq!(types.matches(SLIDE_CONTENT_TYPE).count(), 1);

        let rels = read_part(&second, PRESENTATION_RELS_PART);
        assert_eq!(rels.matches("Target=\"slides/").count(), 1);
    }

    #[test]
    fn table_slide_round_trips_through_package() {
        let writer = writer();
        let engine = LayoutEngine::new(writer.canvas(), LayoutStyle::default());
        let mut doc = AssembledDocument::new(writer.canvas(), 0);
        doc.push(engine.render_table(&TableSlideContent {
            title: "Plans".to_string(),
            table: TableContent {
                headers: vec!["Name".to_string(), "Cost".to_string()],
                rows: vec![vec!["Basic".to_string(), "10".to_string()]],
            },
        }));

        let bytes = writer.write(&doc).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");

        assert!(slide.contains("<a:tbl>"));
        assert!(slide.contains("<a:t>Basic</a:t>"));
    }
}
