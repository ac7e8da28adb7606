//! HTTP routes for deck endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use http::{header, HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{create_slides, generate_plan, health, DeckAppState};

/// Creates the deck router with all endpoints.
///
/// The CORS layer is supplied by the caller so origins stay a deployment concern.
pub fn deck_router(state: DeckAppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/generate-plan", post(generate_plan))
        .route("/api/create-slides", post(create_slides))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Builds a CORS layer allowing the given origins.
///
/// Origins that are not valid header values are ignored.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            super::handlers::X_SKIPPED_SLIDES,
        ])
}
