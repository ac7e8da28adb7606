//! SlideContentDispatcher - generates the content of one planned slide.
//!
//! Dispatch is keyed on the item's slide type: text and table items request
//! their own content shape, any other tag is reported back to the caller.

use std::sync::Arc;
use thiserror::Error;

use super::prompts::{topic_input, TABLE_SLIDE_INSTRUCTIONS, TEXT_SLIDE_INSTRUCTIONS};
use crate::domain::deck::{SlideContent, SlidePlanItem, SlideType, TableSlideContent, TextSlideContent};
use crate::ports::{generate_shape, ContentGenerator, GenerationError, PromptContext};

/// Dispatch failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The item's tag names no known content shape. No generation call was made.
    #[error("unsupported slide type: {0}")]
    UnsupportedSlideType(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Per-slide content generation.
///
/// Calls are independent; the dispatcher holds no per-call state.
pub struct SlideContentDispatcher {
    generator: Arc<dyn ContentGenerator>,
}

impl SlideContentDispatcher {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate(
        &self,
        item: &SlidePlanItem,
        trace_id: &str,
    ) -> Result<SlideContent, DispatchError> {
        let input = topic_input(&item.topic);

        match &item.slide_type {
            SlideType::Text => {
                let prompt = PromptContext::new(TEXT_SLIDE_INSTRUCTIONS, input, trace_id);
                let content: TextSlideContent = generate_shape(self.generator.as_ref(), prompt).await?;
                Ok(content.into())
            }
            SlideType::Table => {
                let prompt = PromptContext::new(TABLE_SLIDE_INSTRUCTIONS, input, trace_id);
                let content: TableSlideContent = generate_shape(self.generator.as_ref(), prompt).await?;
                Ok(content.into())
            }
            SlideType::Unrecognized(tag) => Err(DispatchError::UnsupportedSlideType(tag.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{LlmContentGenerator, MockAIProvider, MockError};

    fn dispatcher(mock: MockAIProvider) -> SlideContentDispatcher {
        SlideContentDispatcher::new(Arc::new(LlmContentGenerator::new(Arc::new(mock))))
    }

    fn item(topic: &str, slide_type: SlideType) -> SlidePlanItem {
        SlidePlanItem::new(topic, slide_type).unwrap()
    }

    #[tokio::test]
    async fn text_item_requests_text_shape() {
        let mock = MockAIProvider::new()
            .with_response(r#"{"title": "Background", "content": "Line A\nLine B"}"#);
        let calls = mock.clone();

        let content = dispatcher(mock)
            .generate(&item("Background", SlideType::Text), "t")
            .await
            .unwrap();

        match content {
            SlideContent::Text(text) => assert_eq!(text.body, "Line A\nLine B"),
            other => panic!("expected text content, got {other:?}"),
        }
        let recorded = calls.get_calls();
        assert_eq!(recorded[0].metadata.operation, "text_slide");
        assert_eq!(recorded[0].messages[0].content, "Topic: Background");
    }

    #[tokio::test]
    async fn table_item_requests_table_shape() {
        let mock = MockAIProvider::new().with_response(
            r#"{"title": "Plans", "table_data": {"headers": ["Plan", "Price"], "rows": [["Basic", 10]]}}"#,
        );
        let calls = mock.clone();

        let content = dispatcher(mock)
            .generate(&item("Plan comparison", SlideType::Table), "t")
            .await
            .unwrap();

        match content {
            SlideContent::Table(table) => {
                assert_eq!(table.table.headers, vec!["Plan", "Price"]);
                assert_eq!(table.table.rows[0][1], "10");
            }
            other => panic!("expected table content, got {other:?}"),
        }
        assert_eq!(calls.get_calls()[0].metadata.operation, "table_slide");
    }

    #[tokio::test]
    async fn unrecognized_type_makes_no_call() {
        let mock = MockAIProvider::new();
        let calls = mock.clone();

        let err = dispatcher(mock)
            .generate(&item("Chart", SlideType::Unrecognized("chart_slide".into())), "t")
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::UnsupportedSlideType(tag) if tag == "chart_slide"));
        assert_eq!(calls.call_count(), 0);
    }

    #[tokio::test]
    async fn generation_failure_propagates() {
        let mock = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 120 });

        let err = dispatcher(mock)
            .generate(&item("Background", SlideType::Text), "t")
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Generation(GenerationError::Provider(_))));
    }
}
