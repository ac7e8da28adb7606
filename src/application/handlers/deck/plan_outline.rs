//! PlanOutlineHandler - turns a free-text request into a slide plan.
//!
//! One generation call, no retries. The narrative and slide-type rules are
//! communicated to the generator; only the shape of the answer is checked.

use std::sync::Arc;
use thiserror::Error;

use super::prompts::PLANNER_INSTRUCTIONS;
use crate::domain::deck::PresentationPlan;
use crate::domain::foundation::ValidationError;
use crate::ports::{generate_shape, ContentGenerator, GenerationError, PromptContext};

/// Command to plan a presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutlineCommand {
    /// The user's request, verbatim.
    pub request: String,
    /// Correlates the generation call with the surrounding request.
    pub trace_id: String,
}

impl PlanOutlineCommand {
    /// Creates a command with a fresh trace id.
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }
}

/// Planning failures.
#[derive(Debug, Error)]
pub enum PlanOutlineError {
    #[error("presentation request cannot be empty")]
    EmptyRequest,

    #[error("plan generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("generated plan is invalid: {0}")]
    InvalidPlan(#[from] ValidationError),
}

/// Handler for outline planning.
///
/// # Dependencies
///
/// - `ContentGenerator`: produces the `presentation_plan` shape
pub struct PlanOutlineHandler {
    generator: Arc<dyn ContentGenerator>,
}

impl PlanOutlineHandler {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self { generator }
    }

    pub async fn handle(&self, cmd: PlanOutlineCommand) -> Result<PresentationPlan, PlanOutlineError> {
        if cmd.request.trim().is_empty() {
            return Err(PlanOutlineError::EmptyRequest);
        }

        tracing::info!(trace_id = %cmd.trace_id, "Planning presentation");

        let prompt = PromptContext::new(PLANNER_INSTRUCTIONS, cmd.request, cmd.trace_id.clone());
        let plan: PresentationPlan = generate_shape(self.generator.as_ref(), prompt).await?;
        plan.validate()?;

        tracing::info!(
            trace_id = %cmd.trace_id,
            slides = plan.len(),
            unrecognized = plan.unrecognized_count(),
            "Presentation planned"
        );

        Ok(plan)
    }
}
