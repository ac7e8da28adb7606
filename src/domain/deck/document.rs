//! Rendered slides and the assembled document.
//!
//! Geometry is expressed in EMUs (914400 per inch) and font sizes in
//! hundredths of a point, the units PresentationML stores natively.

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Converts inches to EMUs.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Converts a point size to hundredths of a point.
pub fn points(value: f64) -> u32 {
    (value * 100.0).round() as u32
}

/// Slide dimensions taken from the base template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideCanvas {
    pub width: i64,
    pub height: i64,
}

impl SlideCanvas {
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// 10in x 7.5in, the classic 4:3 canvas.
    pub fn standard() -> Self {
        Self::new(inches(10.0), inches(7.5))
    }
}

impl Default for SlideCanvas {
    fn default() -> Self {
        Self::standard()
    }
}

/// How a text frame reacts when its text exceeds the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoFit {
    /// Text may overflow the shape.
    #[default]
    None,
    /// Font scale is reduced so the text fits the shape.
    ShrinkOnOverflow,
}

/// Vertical placement of text inside a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAnchor {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Run-level formatting shared by every run of a text frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunStyle {
    pub font: Option<String>,
    /// Size in hundredths of a point.
    pub size: Option<u32>,
    pub bold: bool,
}

/// Paragraphs plus the formatting applied uniformly to them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextFrame {
    pub paragraphs: Vec<String>,
    pub style: RunStyle,
    pub auto_fit: AutoFit,
}

impl TextFrame {
    /// Splits text into one paragraph per line. `\r\n`, `\n` and a bare `\r`
    /// all end a line.
    pub fn from_text(text: &str, style: RunStyle) -> Self {
        let paragraphs = if text.is_empty() {
            Vec::new()
        } else {
            text.replace("\r\n", "\n")
                .split(['\n', '\r'])
                .map(str::to_string)
                .collect()
        };
        Self {
            paragraphs,
            style,
            auto_fit: AutoFit::None,
        }
    }

    pub fn with_auto_fit(mut self, auto_fit: AutoFit) -> Self {
        self.auto_fit = auto_fit;
        self
    }

    /// Paragraph text joined with newlines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.is_empty())
    }
}

/// Layout placeholder a shape binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Title,
    /// Body/content placeholder at index 1.
    Body,
}

/// A placeholder inheriting its position from the template layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderShape {
    pub kind: PlaceholderKind,
    pub frame: TextFrame,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableCell {
    pub frame: TextFrame,
    pub anchor: VerticalAnchor,
    pub wrap: bool,
}

impl TableCell {
    pub fn text(&self) -> String {
        self.frame.text()
    }
}

/// A positioned table with fixed row heights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableShape {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub row_height: i64,
    pub column_widths: Vec<i64>,
    /// Row 0 is the header row.
    pub rows: Vec<Vec<TableCell>>,
}

impl TableShape {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn height(&self) -> i64 {
        self.row_height * self.rows.len() as i64
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

/// A shape placed on a rendered slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Placeholder(PlaceholderShape),
    Table(TableShape),
}

/// A slide ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedSlide {
    pub shapes: Vec<Shape>,
}

impl RenderedSlide {
    fn placeholder(&self, kind: PlaceholderKind) -> Option<&PlaceholderShape> {
        self.shapes.iter().find_map(|shape| match shape {
            Shape::Placeholder(p) if p.kind == kind => Some(p),
            _ => None,
        })
    }

    pub fn title_text(&self) -> Option<String> {
        self.placeholder(PlaceholderKind::Title).map(|p| p.frame.text())
    }

    pub fn body_text(&self) -> Option<String> {
        self.placeholder(PlaceholderKind::Body).map(|p| p.frame.text())
    }

    pub fn body(&self) -> Option<&PlaceholderShape> {
        self.placeholder(PlaceholderKind::Body)
    }

    pub fn table(&self) -> Option<&TableShape> {
        self.shapes.iter().find_map(|shape| match shape {
            Shape::Table(t) => Some(t),
            _ => None,
        })
    }
}

/// Slides in plan order plus the template metadata they were laid out against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    canvas: SlideCanvas,
    layout_index: usize,
    slides: Vec<RenderedSlide>,
}

impl AssembledDocument {
    pub fn new(canvas: SlideCanvas, layout_index: usize) -> Self {
        Self {
            canvas,
            layout_index,
            slides: Vec::new(),
        }
    }

    pub fn push(&mut self, slide: RenderedSlide) {
        self.slides.push(slide);
    }

    pub fn canvas(&self) -> SlideCanvas {
        self.canvas
    }

    /// Index of the template layout every slide is based on.
    pub fn layout_index(&self) -> usize {
        self.layout_index
    }

    pub fn slides(&self) -> &[RenderedSlide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}
