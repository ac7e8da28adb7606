//! Deck module - plans, slide content, sanitization and layout.
//!
//! Everything here is pure: no I/O, no clocks. Generation and serialization
//! live behind ports.

mod content;
mod document;
mod layout;
mod plan;
mod sanitize;
mod shape;

pub use content::{SlideContent, TableContent, TableSlideContent, TextSlideContent};
pub use document::{
    inches, points, AssembledDocument, AutoFit, PlaceholderKind, PlaceholderShape, RenderedSlide,
    RunStyle, Shape, SlideCanvas, TableCell, TableShape, TextFrame, VerticalAnchor, EMU_PER_INCH,
};
pub use layout::{LayoutEngine, LayoutStyle};
pub use plan::{PresentationPlan, SlidePlanItem, SlideType};
pub use sanitize::{is_dash_variant, is_stripped_control, sanitize, sanitize_opt};
pub use shape::{ContentShape, OutputShape};
