//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Anthropic provider, mock provider, structured content generation
//! - `http` - axum routes for planning and deck creation
//! - `pacing` - delays between generation calls
//! - `pptx` - template loading and PresentationML output

pub mod ai;
pub mod http;
pub mod pacing;
pub mod pptx;

pub use pacing::{FixedIntervalPacer, NoDelayPacer};
pub use pptx::{PptxDeckWriter, PptxTemplate};
