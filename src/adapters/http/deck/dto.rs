//! HTTP DTOs for deck endpoints.
//!
//! The approved plan travels in its wire form (`PresentationPlan` serializes
//! as `{"plan": [...], "rationale": "..."}`), so only the planning request and
//! the error body need their own types.

use serde::{Deserialize, Serialize};

/// Request to plan a presentation.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePlanRequest {
    pub prompt: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}
