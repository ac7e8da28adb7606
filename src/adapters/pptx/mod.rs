//! PresentationML adapters.
//!
//! - `PptxTemplate` - Base template parts (built-in or loaded from a file)
//! - `PptxDeckWriter` - DeckWriter producing `.pptx` packages

mod builtin;
mod slide_xml;
mod template;
mod writer;

pub use template::{PptxTemplate, TemplateError};
pub use writer::{PptxDeckWriter, PPTX_CONTENT_TYPE};
