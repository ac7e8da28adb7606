//! Content Generator Port - "generate structured content from a prompt".
//!
//! The planner and the slide dispatcher only depend on this contract: given
//! instructions, an input and an output shape, return a JSON value matching
//! that shape or fail with [`GenerationError`].

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::deck::{ContentShape, OutputShape};
use crate::ports::AIError;

/// Port for structured content generation.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produce a JSON value conforming to `shape`.
    ///
    /// Implementations must fail with [`GenerationError::Parse`] when the
    /// response cannot be read as JSON at all.
    async fn generate(&self, prompt: PromptContext, shape: &OutputShape) -> Result<Value, GenerationError>;
}

/// Instructions and input for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    /// Role and rules for the model.
    pub instructions: String,
    /// The request or topic being worked on.
    pub input: String,
    /// Correlates every call of one pipeline run.
    pub trace_id: String,
}

impl PromptContext {
    pub fn new(
        instructions: impl Into<String>,
        input: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            instructions: instructions.into(),
            input: input.into(),
            trace_id: trace_id.into(),
        }
    }
}

/// Errors from the generation capability.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The underlying provider failed (transport, auth, rate limit, ...).
    #[error("provider error: {0}")]
    Provider(#[from] AIError),

    /// The response could not be read as the requested shape.
    #[error("response does not match {shape}: {message}")]
    Parse {
        shape: &'static str,
        message: String,
    },
}

impl GenerationError {
    pub fn parse(shape: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            shape,
            message: message.into(),
        }
    }
}

/// Requests `T`'s shape and deserializes the result into `T`.
pub async fn generate_shape<T: ContentShape>(
    generator: &dyn ContentGenerator,
    prompt: PromptContext,
) -> Result<T, GenerationError> {
    let shape = T::output_shape();
    let value = generator.generate(prompt, shape).await?;
    serde_json::from_value(value).map_err(|e| GenerationError::parse(shape.name, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::{TableSlideContent, TextSlideContent};
    use serde_json::json;

    struct FixedGenerator(Value);

    #[async_trait]
    impl ContentGenerator for FixedGenerator {
        async fn generate(&self, _prompt: PromptContext, _shape: &OutputShape) -> Result<Value, GenerationError> {
            Ok(self.0.clone())
        }
    }

    fn prompt() -> PromptContext {
        PromptContext::new("rules", "topic", "trace")
    }

    #[tokio::test]
    async fn generate_shape_deserializes_matching_value() {
        let generator = FixedGenerator(json!({"title": "T", "content": "a\nb"}));
        let content: TextSlideContent = generate_shape(&generator, prompt()).await.unwrap();
        assert_eq!(content.body, "a\nb");
    }

    #[tokio::test]
    async fn generate_shape_reports_shape_mismatch() {
        let generator = FixedGenerator(json!({"title": "T"}));
        let err = generate_shape::<TableSlideContent>(&generator, prompt())
            .await
            .unwrap_err();

        match err {
            GenerationError::Parse { shape, .. } => assert_eq!(shape, "table_slide"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn provider_error_converts() {
        let err: GenerationError = AIError::AuthenticationFailed.into();
        assert_eq!(err.to_string(), "provider error: authentication failed");
    }
}
