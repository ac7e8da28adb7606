//! AI Provider Adapters.
//!
//! ## Available Adapters
//!
//! - `AnthropicProvider` - Anthropic Messages API
//! - `MockAIProvider` - Configurable mock for testing
//! - `LlmContentGenerator` - ContentGenerator built on any AIProvider

mod anthropic_provider;
mod llm_content_generator;
mod mock_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use llm_content_generator::LlmContentGenerator;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
