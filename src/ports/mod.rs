//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Generation Ports
//!
//! - `AIProvider` - Chat completion against an LLM vendor
//! - `ContentGenerator` - Structured content for a requested shape
//!
//! ## Pipeline Ports
//!
//! - `Pacer` - Delay policy between consecutive generation calls
//! - `DeckWriter` - Template metadata and document serialization

mod ai_provider;
mod content_generator;
mod deck_writer;
mod pacer;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, RequestMetadata, TokenUsage,
};
pub use content_generator::{generate_shape, ContentGenerator, GenerationError, PromptContext};
pub use deck_writer::{DeckWriteError, DeckWriter};
pub use pacer::Pacer;
