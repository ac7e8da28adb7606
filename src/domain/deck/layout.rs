//! Layout engine - turns structured content into positioned, styled shapes.
//!
//! Every string passes through [`sanitize`] before it lands in a shape, and
//! one font is applied to every run on the slide.
//!
//! Table geometry is fixed: a constant width centered on the canvas, a
//! constant top offset and a constant height per row. Cells wrap instead of
//! growing, so a long cell never changes the row height.

use super::content::{SlideContent, TableContent, TableSlideContent, TextSlideContent};
use super::document::{
    inches, points, AutoFit, PlaceholderKind, PlaceholderShape, RenderedSlide, RunStyle, Shape,
    SlideCanvas, TableCell, TableShape, TextFrame, VerticalAnchor,
};
use super::sanitize::sanitize;

/// Fixed visual rules for rendered slides.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStyle {
    /// Font applied to every run.
    pub font: String,
    /// Table width in EMUs.
    pub table_width: i64,
    /// Distance from the top of the slide to the table, in EMUs.
    pub table_top: i64,
    /// Height of every table row, in EMUs.
    pub row_height: i64,
    /// Header row font size in points.
    pub header_font_size: f64,
    /// Data row font size in points.
    pub data_font_size: f64,
}

impl LayoutStyle {
    pub const DEFAULT_FONT: &'static str = "BIZ UDPGothic";

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            font: Self::DEFAULT_FONT.to_string(),
            table_width: inches(9.0),
            table_top: inches(1.8),
            row_height: inches(0.5),
            header_font_size: 14.0,
            data_font_size: 12.0,
        }
    }
}

/// Renders slide content against one canvas for the whole document.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    canvas: SlideCanvas,
    style: LayoutStyle,
}

impl LayoutEngine {
    pub fn new(canvas: SlideCanvas, style: LayoutStyle) -> Self {
        Self { canvas, style }
    }

    pub fn canvas(&self) -> SlideCanvas {
        self.canvas
    }

    pub fn style(&self) -> &LayoutStyle {
        &self.style
    }

    /// Renders either content shape.
    pub fn render(&self, content: &SlideContent) -> RenderedSlide {
        match content {
            SlideContent::Text(text) => self.render_text(text),
            SlideContent::Table(table) => self.render_table(table),
        }
    }

    /// Title and body; the body shrinks its text to fit.
    pub fn render_text(&self, content: &TextSlideContent) -> RenderedSlide {
        let body = TextFrame::from_text(&sanitize(&content.body), self.font_only())
            .with_auto_fit(AutoFit::ShrinkOnOverflow);

        RenderedSlide {
            shapes: vec![
                self.title_shape(&content.title),
                Shape::Placeholder(PlaceholderShape {
                    kind: PlaceholderKind::Body,
                    frame: body,
                }),
            ],
        }
    }

    /// Title, cleared body placeholder and (when there are columns) a table.
    pub fn render_table(&self, content: &TableSlideContent) -> RenderedSlide {
        let mut shapes = vec![
            self.title_shape(&content.title),
            Shape::Placeholder(PlaceholderShape {
                kind: PlaceholderKind::Body,
                frame: TextFrame::default(),
            }),
        ];

        if let Some(table) = self.table_shape(&content.table) {
            shapes.push(Shape::Table(table));
        }

        RenderedSlide { shapes }
    }

    fn font_only(&self) -> RunStyle {
        RunStyle {
            font: Some(self.style.font.clone()),
            ..RunStyle::default()
        }
    }

    fn title_shape(&self, title: &str) -> Shape {
        Shape::Placeholder(PlaceholderShape {
            kind: PlaceholderKind::Title,
            frame: TextFrame::from_text(&sanitize(title), self.font_only()),
        })
    }

    fn cell(&self, text: &str, style: &RunStyle) -> TableCell {
        TableCell {
            frame: TextFrame::from_text(&sanitize(text), style.clone()),
            anchor: VerticalAnchor::Middle,
            wrap: true,
        }
    }

    fn empty_cell(&self, style: &RunStyle) -> TableCell {
        TableCell {
            frame: TextFrame {
                style: style.clone(),
                ..TextFrame::default()
            },
            anchor: VerticalAnchor::Middle,
            wrap: true,
        }
    }

    /// Returns `None` for a table without columns.
    fn table_shape(&self, table: &TableContent) -> Option<TableShape> {
        let columns = table.column_count();
        if columns == 0 {
            return None;
        }

        let header_style = RunStyle {
            font: Some(self.style.font.clone()),
            size: Some(points(self.style.header_font_size)),
            bold: true,
        };
        let data_style = RunStyle {
            font: Some(self.style.font.clone()),
            size: Some(points(self.style.data_font_size)),
            bold: false,
        };

        let mut rows = Vec::with_capacity(table.rows.len() + 1);
        rows.push(
            table
                .headers
                .iter()
                .map(|header| self.cell(header, &header_style))
                .collect(),
        );

        // Cells past the header width are dropped; short rows keep empty cells.
        for data in &table.rows {
            let row = (0..columns)
                .map(|col| match data.get(col) {
                    Some(text) => self.cell(text, &data_style),
                    None => self.empty_cell(&data_style),
                })
                .collect();
            rows.push(row);
        }

        let width = self.style.table_width;
        Some(TableShape {
            x: (self.canvas.width - width) / 2,
            y: self.style.table_top,
            width,
            row_height: self.style.row_height,
            column_widths: split_evenly(width, columns),
            rows,
        })
    }
}

/// Splits a width into `parts` columns; the last column absorbs the remainder.
fn split_evenly(width: i64, parts: usize) -> Vec<i64> {
    let base = width / parts as i64;
    let mut widths = vec![base; parts];
    if let Some(last) = widths.last_mut() {
        *last += width - base * parts as i64;
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(SlideCanvas::standard(), LayoutStyle::default())
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn table_content(headers: &[&str], rows: &[&[&str]]) -> TableSlideContent {
        TableSlideContent::new(
            "Comparison",
            TableContent::new(strings(headers), rows.iter().map(|r| strings(r)).collect()),
        )
    }

    #[test]
    fn text_slide_carries_title_and_body() {
        let slide = engine().render_text(&TextSlideContent::new("Intro Title", "Line one\nLine two"));

        assert_eq!(slide.title_text().as_deref(), Some("Intro Title"));
        assert_eq!(slide.body_text().as_deref(), Some("Line one\nLine two"));
        assert!(slide.table().is_none());
    }

    #[test]
    fn text_slide_body_shrinks_and_uses_font() {
        let slide = engine().render_text(&TextSlideContent::new("T", "b"));
        let body = slide.body().unwrap();

        assert_eq!(body.frame.auto_fit, AutoFit::ShrinkOnOverflow);
        assert_eq!(body.frame.style.font.as_deref(), Some("BIZ UDPGothic"));
    }

    #[test]
    fn text_slide_is_sanitized() {
        let slide = engine().render_text(&TextSlideContent::new(
            "  Q1\u{2013}Q2 \u{0007}",
            "\nfirst\u{2014}line\nsecond\n",
        ));

        assert_eq!(slide.title_text().as_deref(), Some("Q1-Q2"));
        assert_eq!(slide.body_text().as_deref(), Some("first-line\nsecond"));
    }

    #[test]
    fn table_has_header_plus_data_rows() {
        let slide = engine().render_table(&table_content(&["A", "B"], &[&["1", "2"], &["3", "4", "5"]]));
        let table = slide.table().unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert!(table.rows.iter().all(|row| row.len() == 2));
        assert_eq!(table.cell(2, 1).unwrap().text(), "4");
        assert!(table.rows.iter().flatten().all(|cell| cell.text() != "5"));
    }

    #[test]
    fn short_rows_leave_trailing_cells_empty() {
        let slide = engine().render_table(&table_content(&["A", "B", "C"], &[&["only"]]));
        let table = slide.table().unwrap();

        assert_eq!(table.cell(1, 0).unwrap().text(), "only");
        assert_eq!(table.cell(1, 1).unwrap().text(), "");
        assert_eq!(table.cell(1, 2).unwrap().text(), "");
    }

    #[test]
    fn zero_columns_creates_no_table() {
        let slide = engine().render_table(&table_content(&[], &[&["orphan"]]));

        assert!(slide.table().is_none());
        assert_eq!(slide.title_text().as_deref(), Some("Comparison"));
    }

    #[test]
    fn table_body_placeholder_is_cleared() {
        let slide = engine().render_table(&table_content(&["A"], &[]));
        assert_eq!(slide.body_text().as_deref(), Some(""));
    }

    #[test]
    fn table_is_centered_at_fixed_top() {
        let slide = engine().render_table(&table_content(&["A", "B"], &[&["1", "2"]]));
        let table = slide.table().unwrap();

        assert_eq!(table.width, inches(9.0));
        assert_eq!(table.x, (inches(10.0) - inches(9.0)) / 2);
        assert_eq!(table.y, inches(1.8));
        assert_eq!(table.column_widths.iter().sum::<i64>(), table.width);
    }

    #[test]
    fn row_height_ignores_content_length() {
        let long = "word ".repeat(200);
        let short = engine().render_table(&table_content(&["A"], &[&["x"]]));
        let tall = engine().render_table(&table_content(&["A"], &[&[long.as_str()]]));

        assert_eq!(short.table().unwrap().row_height, tall.table().unwrap().row_height);
        assert_eq!(tall.table().unwrap().height(), inches(0.5) * 2);
    }

    #[test]
    fn header_and_data_cells_are_styled() {
        let slide = engine().render_table(&table_content(&["Head"], &[&["data"]]));
        let table = slide.table().unwrap();
        let header = table.cell(0, 0).unwrap();
        let data = table.cell(1, 0).unwrap();

        assert!(header.frame.style.bold);
        assert_eq!(header.frame.style.size, Some(1400));
        assert!(!data.frame.style.bold);
        assert_eq!(data.frame.style.size, Some(1200));
        assert!(table
            .rows
            .iter()
            .flatten()
            .all(|cell| cell.anchor == VerticalAnchor::Middle && cell.wrap));
    }

    #[test]
    fn cells_are_sanitized() {
        let slide = engine().render_table(&table_content(&[" A\u{2012}B "], &[&["\u{0001}1\u{2010}2"]]));
        let table = slide.table().unwrap();

        assert_eq!(table.cell(0, 0).unwrap().text(), "A-B");
        assert_eq!(table.cell(1, 0).unwrap().text(), "1-2");
    }

    #[test]
    fn split_evenly_covers_full_width() {
        assert_eq!(split_evenly(10, 3), vec![3, 3, 4]);
        assert_eq!(split_evenly(9, 1), vec![9]);
    }
}
