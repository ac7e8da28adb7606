//! Deck Writer Port - serialization of an assembled document.
//!
//! The writer owns the base template: it reports the canvas and layout slides
//! are laid out against, and turns an [`AssembledDocument`] into the bytes of
//! the output file.

use thiserror::Error;

use crate::domain::deck::{AssembledDocument, SlideCanvas};

/// Port for writing presentation documents.
///
/// # Contract
///
/// - `canvas()` and `layout_index()` describe the template and never change
///   for the lifetime of the writer.
/// - `write()` is pure with respect to the writer: concurrent calls from
///   independent requests do not affect each other.
pub trait DeckWriter: Send + Sync {
    /// Canvas of the base template.
    fn canvas(&self) -> SlideCanvas;

    /// Layout every slide is created from.
    fn layout_index(&self) -> usize;

    /// MIME type of the produced file.
    fn content_type(&self) -> &'static str;

    /// Serializes the document.
    fn write(&self, document: &AssembledDocument) -> Result<Vec<u8>, DeckWriteError>;
}

/// Errors raised while serializing a document.
#[derive(Debug, Error)]
pub enum DeckWriteError {
    #[error("layout {index} not found in template ({available} available)")]
    MissingLayout { index: usize, available: usize },

    #[error("template part {0} is malformed: {1}")]
    MalformedPart(String, String),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
