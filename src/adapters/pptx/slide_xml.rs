//! Slide part serialization.

use std::borrow::Cow;
use std::fmt::Write as _;

use quick_xml::escape::escape;

use super::builtin::{NS_A, NS_P, NS_R};
use crate::domain::deck::{
    AutoFit, PlaceholderKind, PlaceholderShape, RenderedSlide, RunStyle, Shape, TableCell,
    TableShape, TextFrame, VerticalAnchor,
};

const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";

/// True for characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escapes text for element content and attribute values, dropping characters
/// a well-formed part cannot carry.
pub(crate) fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        escape(text)
    } else {
        let kept: String = text.chars().filter(|c| is_xml_char(*c)).collect();
        Cow::Owned(escape(&kept).into_owned())
    }
}

/// Renders `ppt/slides/slideN.xml` for one slide.
pub(crate) fn slide_xml(slide: &RenderedSlide) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    let _ = write!(
        xml,
        "<p:sld xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\"><p:cSld><p:spTree>",
        NS_A, NS_R, NS_P
    );
    xml.push_str("<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>");
    xml.push_str(
        "<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
         <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>",
    );

    // Shape id 1 is the group root.
    for (offset, shape) in slide.shapes.iter().enumerate() {
        let id = offset + 2;
        match shape {
            Shape::Placeholder(placeholder) => write_placeholder(&mut xml, id, placeholder),
            Shape::Table(table) => write_table(&mut xml, id, table),
        }
    }

    xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

fn write_placeholder(xml: &mut String, id: usize, shape: &PlaceholderShape) {
    let (name, ph) = match shape.kind {
        PlaceholderKind::Title => ("Title", "<p:ph type=\"title\"/>"),
        PlaceholderKind::Body => ("Content Placeholder", "<p:ph idx=\"1\"/>"),
    };

    let _ = write!(
        xml,
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name} {n}\"/>\
         <p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr><p:nvPr>{ph}</p:nvPr></p:nvSpPr>\
         <p:spPr/><p:txBody>",
        id = id,
        name = name,
        n = id - 1,
        ph = ph
    );
    write_body_properties(xml, &shape.frame, None);
    xml.push_str("<a:lstStyle/>");
    write_paragraphs(xml, &shape.frame);
    xml.push_str("</p:txBody></p:sp>");
}

fn write_body_properties(xml: &mut String, frame: &TextFrame, wrap: Option<bool>) {
    let wrap_attr = match wrap {
        Some(true) => " wrap=\"square\"",
        Some(false) => " wrap=\"none\"",
        None => "",
    };
    match frame.auto_fit {
        AutoFit::None => {
            let _ = write!(xml, "<a:bodyPr{}/>", wrap_attr);
        }
        AutoFit::ShrinkOnOverflow => {
            let _ = write!(xml, "<a:bodyPr{}><a:normAutofit/></a:bodyPr>", wrap_attr);
        }
    }
}

fn write_paragraphs(xml: &mut String, frame: &TextFrame) {
    if frame.paragraphs.is_empty() {
        xml.push_str("<a:p/>");
        return;
    }

    for paragraph in &frame.paragraphs {
        xml.push_str("<a:p>");
        if paragraph.is_empty() {
            xml.push_str("<a:endParaRPr lang=\"en-US\" dirty=\"0\"/>");
        } else {
            xml.push_str("<a:r>");
            write_run_properties(xml, &frame.style);
            let _ = write!(xml, "<a:t>{}</a:t>", xml_text(paragraph));
            xml.push_str("</a:r>");
        }
        xml.push_str("</a:p>");
    }
}

fn write_run_properties(xml: &mut String, style: &RunStyle) {
    xml.push_str("<a:rPr lang=\"en-US\"");
    if let Some(size) = style.size {
        let _ = write!(xml, " sz=\"{}\"", size);
    }
    if style.bold {
        xml.push_str(" b=\"1\"");
    }
    xml.push_str(" dirty=\"0\"");

    match &style.font {
        Some(font) => {
            let font = xml_text(font);
            let _ = write!(
                xml,
                "><a:latin typeface=\"{f}\"/><a:ea typeface=\"{f}\"/></a:rPr>",
                f = font
            );
        }
        None => xml.push_str("/>"),
    }
}

fn anchor_attr(anchor: VerticalAnchor) -> &'static str {
    match anchor {
        VerticalAnchor::Top => "t",
        VerticalAnchor::Middle => "ctr",
        VerticalAnchor::Bottom => "b",
    }
}

fn write_table(xml: &mut String, id: usize, table: &TableShape) {
    let _ = write!(
        xml,
        "<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id=\"{id}\" name=\"Table {n}\"/>\
         <p:cNvGraphicFramePr><a:graphicFrameLocks noGrp=\"1\"/></p:cNvGraphicFramePr><p:nvPr/>\
         </p:nvGraphicFramePr><p:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></p:xfrm>\
         <a:graphic><a:graphicData uri=\"{uri}\"><a:tbl><a:tblPr firstRow=\"1\" bandRow=\"1\"/><a:tblGrid>",
        id = id,
        n = id - 1,
        x = table.x,
        y = table.y,
        cx = table.width,
        cy = table.height(),
        uri = TABLE_URI
    );
    for width in &table.column_widths {
        let _ = write!(xml, "<a:gridCol w=\"{}\"/>", width);
    }
    xml.push_str("</a:tblGrid>");

    let columns = table.column_count();
    let empty = TableCell::default();
    for row in &table.rows {
        let _ = write!(xml, "<a:tr h=\"{}\">", table.row_height);
        // Every row carries exactly one cell per grid column.
        for col in 0..columns {
            write_cell(xml, row.get(col).unwrap_or(&empty));
        }
        xml.push_str("</a:tr>");
    }

    xml.push_str("</a:tbl></a:graphicData></a:graphic></p:graphicFrame>");
}

fn write_cell(xml: &mut String, cell: &TableCell) {
    xml.push_str("<a:tc><a:txBody>");
    write_body_properties(xml, &cell.frame, Some(cell.wrap));
    xml.push_str("<a:lstStyle/>");
    write_paragraphs(xml, &cell.frame);
    let _ = write!(
        xml,
        "</a:txBody><a:tcPr anchor=\"{}\"/></a:tc>",
        anchor_attr(cell.anchor)
    );
}
