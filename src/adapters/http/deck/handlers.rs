//! HTTP handlers for deck endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use http::{
    header::{InvalidHeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE},
    HeaderName, HeaderValue, StatusCode,
};
use thiserror::Error;

use crate::application::handlers::deck::{
    BuildDeckCommand, BuildDeckError, BuildDeckHandler, BuildOutcome, PlanOutlineCommand,
    PlanOutlineError, PlanOutlineHandler,
};
use crate::domain::deck::PresentationPlan;

use super::dto::{ErrorResponse, GeneratePlanRequest};

/// Lists 1-based plan positions skipped for an unrecognized slide type.
pub const X_SKIPPED_SLIDES: HeaderName = HeaderName::from_static("x-skipped-slides");

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DeckAppState {
    planner: Arc<PlanOutlineHandler>,
    builder: Arc<BuildDeckHandler>,
    content_disposition: HeaderValue,
}

impl DeckAppState {
    /// Fails when `output_filename` cannot be carried in a header value.
    pub fn new(
        planner: Arc<PlanOutlineHandler>,
        builder: Arc<BuildDeckHandler>,
        output_filename: &str,
    ) -> Result<Self, InvalidHeaderValue> {
        let content_disposition =
            HeaderValue::from_str(&format!("attachment; filename=\"{}\"", output_filename))?;
        Ok(Self {
            planner,
            builder,
            content_disposition,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// Deck API failures, mapped onto status codes and [`ErrorResponse`] bodies.
#[derive(Debug, Error)]
pub enum DeckApiError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,

    /// Details are logged, never returned to the client.
    #[error("planning failed")]
    PlanningFailed,

    #[error("plan is invalid: {0}")]
    InvalidPlan(String),

    #[error("failed to generate slide {index} (topic: '{topic}')")]
    SlideFailed { index: usize, topic: String },

    #[error("failed to write presentation")]
    WriteFailed,
}

impl DeckApiError {
    fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        match self {
            Self::EmptyPrompt => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request("Prompt cannot be empty"),
            ),
            Self::InvalidPlan(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_PLAN", message.clone()),
            ),
            Self::PlanningFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("PLANNING_FAILED", "Failed to generate a presentation plan"),
            ),
            Self::SlideFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("SLIDE_GENERATION_FAILED", self.to_string()),
            ),
            Self::WriteFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::internal("Failed to write presentation"),
            ),
        }
    }
}

impl IntoResponse for DeckApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<PlanOutlineError> for DeckApiError {
    fn from(err: PlanOutlineError) -> Self {
        match err {
            PlanOutlineError::EmptyRequest => Self::EmptyPrompt,
            other => {
                tracing::error!(error = %other, "Planning failed");
                Self::PlanningFailed
            }
        }
    }
}

impl From<BuildDeckError> for DeckApiError {
    fn from(err: BuildDeckError) -> Self {
        match err {
            BuildDeckError::Planning(e) => e.into(),
            BuildDeckError::InvalidPlan(e) => Self::InvalidPlan(e.to_string()),
            BuildDeckError::SlideGeneration { index, topic, .. } => Self::SlideFailed { index, topic },
            BuildDeckError::Write(e) => {
                tracing::error!(error = %e, "Writing presentation failed");
                Self::WriteFailed
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/generate-plan - Plan a presentation from a free-text prompt
pub async fn generate_plan(
    State(state): State<DeckAppState>,
    Json(req): Json<GeneratePlanRequest>,
) -> Result<Json<PresentationPlan>, DeckApiError> {
    let plan = state.planner.handle(PlanOutlineCommand::new(req.prompt)).await?;
    Ok(Json(plan))
}

/// POST /api/create-slides - Build the deck for an approved plan
pub async fn create_slides(
    State(state): State<DeckAppState>,
    Json(plan): Json<PresentationPlan>,
) -> Result<Response, DeckApiError> {
    let outcome = state.builder.handle(BuildDeckCommand::new(plan)).await?;
    Ok(download_response(outcome, state.content_disposition))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

fn download_response(outcome: BuildOutcome, content_disposition: HeaderValue) -> Response {
    let BuildOutcome {
        bytes,
        content_type,
        skipped,
        ..
    } = outcome;

    let mut response = (StatusCode::OK, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(CONTENT_DISPOSITION, content_disposition);

    if !skipped.is_empty() {
        let list = skipped
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        if let Ok(value) = HeaderValue::from_str(&list) {
            headers.insert(X_SKIPPED_SLIDES, value);
        }
    }

    response
}
