//! Content shapes - the JSON structures a generation call is asked to return.
//!
//! Each shape is described by an embedded JSON Schema. Generators use the
//! schema to instruct the model; the typed value is recovered with serde.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::content::{TableSlideContent, TextSlideContent};
use super::plan::PresentationPlan;

/// Name and schema of a requested output structure.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputShape {
    pub name: &'static str,
    pub schema: Value,
}

impl OutputShape {
    fn from_embedded(name: &'static str, raw: &str) -> Self {
        // Embedded schemas are fixed at compile time and covered by tests.
        let schema = serde_json::from_str(raw).unwrap_or(Value::Null);
        Self { name, schema }
    }

    /// Schema rendered as pretty-printed JSON.
    pub fn schema_text(&self) -> String {
        serde_json::to_string_pretty(&self.schema).unwrap_or_default()
    }
}

static PLAN_SHAPE: Lazy<OutputShape> = Lazy::new(|| {
    OutputShape::from_embedded("presentation_plan", include_str!("schemas/presentation_plan.json"))
});

static TEXT_SHAPE: Lazy<OutputShape> =
    Lazy::new(|| OutputShape::from_embedded("text_slide", include_str!("schemas/text_slide.json")));

static TABLE_SHAPE: Lazy<OutputShape> =
    Lazy::new(|| OutputShape::from_embedded("table_slide", include_str!("schemas/table_slide.json")));

/// A typed value that can be requested from a content generator.
pub trait ContentShape: DeserializeOwned + Send {
    fn output_shape() -> &'static OutputShape;
}

impl ContentShape for PresentationPlan {
    fn output_shape() -> &'static OutputShape {
        &PLAN_SHAPE
    }
}

impl ContentShape for TextSlideContent {
    fn output_shape() -> &'static OutputShape {
        &TEXT_SHAPE
    }
}

impl ContentShape for TableSlideContent {
    fn output_shape() -> &'static OutputShape {
        &TABLE_SHAPE
    }
}
