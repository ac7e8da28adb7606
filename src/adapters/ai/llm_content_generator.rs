//! LLM-backed ContentGenerator.
//!
//! Sends the shape's JSON Schema alongside the instructions, then recovers a
//! JSON object from the model's reply. Replies wrapped in markdown fences or
//! surrounded by prose are tolerated. Truncated or filtered replies are
//! rejected before parsing.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::domain::deck::OutputShape;
use crate::ports::{
    AIProvider, CompletionRequest, ContentGenerator, FinishReason, GenerationError, MessageRole,
    PromptContext, RequestMetadata,
};

/// Content generator that asks an [`AIProvider`] for schema-shaped JSON.
pub struct LlmContentGenerator {
    ai_provider: Arc<dyn AIProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmContentGenerator {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self {
            ai_provider,
            temperature: 0.1,
            max_tokens: 4096,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn system_prompt(instructions: &str, shape: &OutputShape) -> String {
        format!(
            "{}\n\nRespond with a single JSON object that conforms to this JSON Schema \
             ({}). Do not add commentary before or after the JSON.\n\n{}",
            instructions.trim_end(),
            shape.name,
            shape.schema_text()
        )
    }

    fn build_request(&self, prompt: &PromptContext, shape: &OutputShape) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(shape.name, prompt.trace_id.clone()))
            .with_system_prompt(Self::system_prompt(&prompt.instructions, shape))
            .with_message(MessageRole::User, prompt.input.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(
        &self,
        prompt: PromptContext,
        shape: &OutputShape,
    ) -> Result<Value, GenerationError> {
        let request = self.build_request(&prompt, shape);
        let response = self.ai_provider.complete(request).await?;

        match response.finish_reason {
            FinishReason::Stop => {}
            FinishReason::Length => {
                return Err(GenerationError::parse(shape.name, "response truncated"));
            }
            FinishReason::ContentFilter => {
                return Err(GenerationError::parse(shape.name, "response withheld by content filter"));
            }
        }

        let value = parse_json_object(&response.content)
            .map_err(|message| GenerationError::parse(shape.name, message))?;

        tracing::debug!(
            shape = shape.name,
            trace_id = %prompt.trace_id,
            model = %response.model,
            completion_tokens = response.usage.completion_tokens,
            "Structured content generated"
        );

        Ok(value)
    }
}

/// Parses the JSON object in a model reply.
///
/// Candidates are tried in order: a fenced code block, everything from the
/// first `{` to the last `}`, then each balanced object in reading order. The
/// first candidate that parses as an object wins; otherwise the error of the
/// earliest candidate is reported.
fn parse_json_object(response: &str) -> Result<Value, String> {
    let mut first_error = None;

    for candidate in json_candidates(response.trim()) {
        match serde_json::from_str::<Map<String, Value>>(candidate) {
            Ok(object) => return Ok(Value::Object(object)),
            Err(e) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    Err(first_error.unwrap_or_else(|| "no JSON object in response".to_string()))
}

fn json_candidates(s: &str) -> Vec<&str> {
    let mut candidates = Vec::new();

    if let Some(fenced) = extract_from_code_block(s) {
        if fenced.starts_with('{') {
            candidates.push(fenced);
        }
    }

    if let (Some(start), Some(end)) = (s.find('{'), s.rfind('}')) {
        if end > start {
            candidates.push(&s[start..=end]);
        }
    }

    for (start, _) in s.match_indices('{') {
        if let Some(object) = extract_balanced_object(s, start) {
            if !candidates.contains(&object) {
                candidates.push(object);
            }
        }
    }

    candidates
}

fn extract_from_code_block(s: &str) -> Option<&str> {
    let patterns = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

    for pattern in patterns {
        if let Some(start) = s.find(pattern) {
            let body_start = start + pattern.len();
            if let Some(end) = s[body_start..].find("```") {
                return Some(s[body_start..body_start + end].trim());
            }
        }
    }
    None
}

fn extract_balanced_object(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
