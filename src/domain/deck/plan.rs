//! Presentation plan - the ordered outline produced before any content exists.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Kind of slide a plan item asks for.
///
/// The wire tags are `text_slide` and `table_slide`. Any other tag is kept
/// verbatim in [`SlideType::Unrecognized`] instead of failing deserialization,
/// so the orchestrator decides what happens to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlideType {
    /// Title and free-text body.
    Text,
    /// Title and a comparison table.
    Table,
    /// A tag this version does not know how to generate.
    Unrecognized(String),
}

impl SlideType {
    pub const TEXT_TAG: &'static str = "text_slide";
    pub const TABLE_TAG: &'static str = "table_slide";

    /// Wire tag for this slide type.
    pub fn as_tag(&self) -> &str {
        match self {
            SlideType::Text => Self::TEXT_TAG,
            SlideType::Table => Self::TABLE_TAG,
            SlideType::Unrecognized(tag) => tag,
        }
    }

    /// Returns true when the dispatcher has a content shape for this type.
    pub fn is_supported(&self) -> bool {
        !matches!(self, SlideType::Unrecognized(_))
    }
}

impl From<String> for SlideType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            Self::TEXT_TAG => SlideType::Text,
            Self::TABLE_TAG => SlideType::Table,
            _ => SlideType::Unrecognized(tag),
        }
    }
}

impl From<SlideType> for String {
    fn from(slide_type: SlideType) -> Self {
        slide_type.as_tag().to_string()
    }
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// One planned slide: what it talks about and which shape it takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePlanItem {
    /// Specific topic this slide must cover.
    pub topic: String,
    /// Shape of content to generate for the topic.
    pub slide_type: SlideType,
}

impl SlidePlanItem {
    /// Creates a plan item, rejecting a blank topic.
    pub fn new(topic: impl Into<String>, slide_type: SlideType) -> Result<Self, ValidationError> {
        let item = Self {
            topic: topic.into(),
            slide_type,
        };
        item.validate()?;
        Ok(item)
    }

    /// Checks the non-empty topic invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topic.trim().is_empty() {
            return Err(ValidationError::empty_field("topic"));
        }
        Ok(())
    }
}

/// The full outline plus the reasoning behind its structure.
///
/// Item order is slide order. The plan is the only source of truth for how
/// many slides a build attempts and in which sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationPlan {
    #[serde(rename = "plan")]
    items: Vec<SlidePlanItem>,
    #[serde(default)]
    rationale: String,
}

impl PresentationPlan {
    /// Creates a plan after checking every item.
    pub fn new(items: Vec<SlidePlanItem>, rationale: impl Into<String>) -> Result<Self, ValidationError> {
        let plan = Self {
            items,
            rationale: rationale.into(),
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Checks every item, reporting the first offending position.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (index, item) in self.items.iter().enumerate() {
            item.validate().map_err(|_| {
                ValidationError::invalid_format(
                    format!("plan[{}].topic", index),
                    "topic cannot be empty",
                )
            })?;
        }
        Ok(())
    }

    pub fn items(&self) -> &[SlidePlanItem] {
        &self.items
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items whose type has no content shape.
    pub fn unrecognized_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| !item.slide_type.is_supported())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slide_type_parses_known_tags() {
        assert_eq!(SlideType::from("text_slide".to_string()), SlideType::Text);
        assert_eq!(SlideType::from("table_slide".to_string()), SlideType::Table);
    }

    #[test]
    fn slide_type_keeps_unknown_tag() {
        let parsed: SlideType = serde_json::from_value(json!("chart_slide")).unwrap();
        assert_eq!(parsed, SlideType::Unrecognized("chart_slide".to_string()));
        assert!(!parsed.is_supported());
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json!("chart_slide"));
    }

    #[test]
    fn plan_deserializes_from_wire_format() {
        let plan: PresentationPlan = serde_json::from_value(json!({
            "plan": [
                {"topic": "Why go paperless", "slide_type": "text_slide"},
                {"topic": "Cloud DMS options compared", "slide_type": "table_slide"}
            ],
            "rationale": "Intro, comparison, close."
        }))
        .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.items()[1].slide_type, SlideType::Table);
        assert_eq!(plan.rationale(), "Intro, comparison, close.");
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn plan_serializes_items_under_plan_key() {
        let plan = PresentationPlan::new(
            vec![SlidePlanItem::new("Intro", SlideType::Text).unwrap()],
            "why",
        )
        .unwrap();

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["plan"][0]["topic"], "Intro");
        assert_eq!(value["plan"][0]["slide_type"], "text_slide");
        assert_eq!(value["rationale"], "why");
    }

    #[test]
    fn blank_topic_is_rejected() {
        assert!(SlidePlanItem::new("   ", SlideType::Text).is_err());

        let plan: PresentationPlan = serde_json::from_value(json!({
            "plan": [
                {"topic": "ok", "slide_type": "text_slide"},
                {"topic": "", "slide_type": "text_slide"}
            ],
            "rationale": ""
        }))
        .unwrap();
        let err = plan.validate().unwrap_err();
        assert!(err.to_string().contains("plan[1].topic"));
    }

    #[test]
    fn empty_plan_is_valid() {
        let plan = PresentationPlan::new(Vec::new(), "nothing to say").unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn counts_unrecognized_items() {
        let plan = PresentationPlan::new(
            vec![
                SlidePlanItem::new("a", SlideType::Text).unwrap(),
                SlidePlanItem::new("b", SlideType::Unrecognized("video".into())).unwrap(),
            ],
            "",
        )
        .unwrap();
        assert_eq!(plan.unrecognized_count(), 1);
    }
}
