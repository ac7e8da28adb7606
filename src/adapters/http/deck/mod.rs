//! HTTP adapter for deck endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, GeneratePlanRequest};
pub use handlers::{DeckApiError, DeckAppState, X_SKIPPED_SLIDES};
pub use routes::{cors_layer, deck_router};
