//! Integration tests for the deck HTTP endpoints.
//!
//! These tests drive the full router with a scripted AI provider, a zero-delay
//! pacer and the built-in template, then read the produced archive back.

use std::io::{Cursor, Read};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use deckwright::adapters::ai::{LlmContentGenerator, MockAIProvider, MockError};
use deckwright::adapters::http::{cors_layer, deck_router, DeckAppState};
use deckwright::adapters::pacing::NoDelayPacer;
use deckwright::adapters::pptx::{PptxDeckWriter, PptxTemplate, PPTX_CONTENT_TYPE};
use deckwright::application::{BuildDeckHandler, PlanOutlineHandler, SlideContentDispatcher};
use deckwright::domain::deck::LayoutStyle;
use deckwright::ports::ContentGenerator;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(mock: MockAIProvider) -> Router {
    let generator: Arc<dyn ContentGenerator> = Arc::new(LlmContentGenerator::new(Arc::new(mock)));
    let writer = PptxDeckWriter::new(Arc::new(PptxTemplate::builtin()), 0).unwrap();

    let planner = Arc::new(PlanOutlineHandler::new(generator.clone()));
    let builder = Arc::new(BuildDeckHandler::new(
        PlanOutlineHandler::new(generator.clone()),
        SlideContentDispatcher::new(generator),
        Arc::new(writer),
        Arc::new(NoDelayPacer),
        LayoutStyle::default(),
    ));

    let state = DeckAppState::new(planner, builder, "generated_presentation.pptx").unwrap();
    deck_router(state, cors_layer(&["http://localhost:5173".to_string()]))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn read_part(archive: &[u8], name: &str) -> String {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut file = zip.by_name(name).unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

fn slide_parts(archive: &[u8]) -> Vec<String> {
    let zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut names: Vec<String> = zip
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

// =============================================================================
// Planning
// =============================================================================

#[tokio::test]
async fn generate_plan_returns_plan_json() {
    let mock = MockAIProvider::new().with_response(
        r#"Here is the plan:
```json
{"plan": [
  {"topic": "Why now", "slide_type": "text_slide"},
  {"topic": "Plan comparison", "slide_type": "table_slide"}
], "rationale": "problem then options"}
```"#,
    );

    let response = app(mock)
        .oneshot(post_json("/api/generate-plan", json!({"prompt": "Pitch our new pricing"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["plan"][0]["topic"], "Why now");
    assert_eq!(body["plan"][1]["slide_type"], "table_slide");
    assert_eq!(body["rationale"], "problem then options");
}

#[tokio::test]
async fn generate_plan_rejects_empty_prompt() {
    let mock = MockAIProvider::new();
    let calls = mock.clone();

    let response = app(mock)
        .oneshot(post_json("/api/generate-plan", json!({"prompt": "  "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.call_count(), 0);
}

#[tokio::test]
async fn generate_plan_failure_is_generic_500() {
    let mock = MockAIProvider::new().with_error(MockError::Unavailable {
        message: "upstream exploded".to_string(),
    });

    let response = app(mock)
        .oneshot(post_json("/api/generate-plan", json!({"prompt": "Pitch"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "PLANNING_FAILED");
    assert!(!body["message"].as_str().unwrap().contains("exploded"));
}

// =============================================================================
// Deck creation
// =============================================================================

#[tokio::test]
async fn create_slides_returns_pptx_in_plan_order() {
    let mock = MockAIProvider::new()
        .with_response(r#"{"title": "Why now", "content": "Costs rose\nChurn rose"}"#)
        .with_response(
            r#"{"title": "Plans", "table_data": {"headers": ["Plan", "Price"], "rows": [["Basic", 10], ["Pro", null]]}}"#,
        );
    let calls = mock.clone();

    let plan = json!({
        "plan": [
            {"topic": "Why now", "slide_type": "text_slide"},
            {"topic": "Plan comparison", "slide_type": "table_slide"}
        ],
        "rationale": ""
    });

    let response = app(mock)
        .oneshot(post_json("/api/create-slides", plan))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], PPTX_CONTENT_TYPE);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"generated_presentation.pptx\""
    );
    assert!(response.headers().get("x-skipped-slides").is_none());

    let archive = body_bytes(response).await;
    assert_eq!(slide_parts(&archive).len(), 2);

    let first = read_part(&archive, "ppt/slides/slide1.xml");
    assert!(first.contains("<a:t>Why now</a:t>"));
    assert!(first.contains("<a:t>Churn rose</a:t>"));

    let second = read_part(&archive, "ppt/slides/slide2.xml");
    assert!(second.contains("<a:tbl>"));
    assert!(second.contains("<a:t>Basic</a:t>"));
    assert!(second.contains("<a:t>10</a:t>"));

    let recorded = calls.get_calls();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].metadata.operation, "text_slide");
    assert_eq!(recorded[1].metadata.operation, "table_slide");
}

#[tokio::test]
async fn create_slides_skips_unrecognized_types() {
    let mock = MockAIProvider::new()
        .with_response(r#"{"title": "Intro", "content": "Hello"}"#)
        .with_response(r#"{"title": "Close", "content": "Bye"}"#);
    let calls = mock.clone();

    let plan = json!({
        "plan": [
            {"topic": "Intro", "slide_type": "text_slide"},
            {"topic": "Revenue chart", "slide_type": "chart_slide"},
            {"topic": "Close", "slide_type": "text_slide"}
        ],
        "rationale": ""
    });

    let response = app(mock)
        .oneshot(post_json("/api/create-slides", plan))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-skipped-slides"], "2");

    let archive = body_bytes(response).await;
    assert_eq!(slide_parts(&archive).len(), 2);
    assert!(read_part(&archive, "ppt/slides/slide2.xml").contains("<a:t>Close</a:t>"));
    assert_eq!(calls.call_count(), 2);
}

#[tokio::test]
async fn create_slides_empty_plan_yields_empty_deck() {
    let response = app(MockAIProvider::new())
        .oneshot(post_json("/api/create-slides", json!({"plan": [], "rationale": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let archive = body_bytes(response).await;
    assert!(slide_parts(&archive).is_empty());
    assert!(read_part(&archive, "ppt/presentation.xml").contains("<p:sldSz"));
}

#[tokio::test]
async fn create_slides_failure_names_slide_and_topic() {
    let mock = MockAIProvider::new()
        .with_response(r#"{"title": "Intro", "content": "Hello"}"#)
        .with_response("not json at all");

    let plan = json!({
        "plan": [
            {"topic": "Intro", "slide_type": "text_slide"},
            {"topic": "Market size", "slide_type": "text_slide"}
        ],
        "rationale": ""
    });

    let response = app(mock)
        .oneshot(post_json("/api/create-slides", plan))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "SLIDE_GENERATION_FAILED");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains('2'));
    assert!(message.contains("Market size"));
}

#[tokio::test]
async fn create_slides_rejects_blank_topic_before_generation() {
    let mock = MockAIProvider::new();
    let calls = mock.clone();

    let plan = json!({
        "plan": [{"topic": "", "slide_type": "text_slide"}],
        "rationale": ""
    });

    let response = app(mock)
        .oneshot(post_json("/api/create-slides", plan))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.call_count(), 0);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let response = app(MockAIProvider::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}
