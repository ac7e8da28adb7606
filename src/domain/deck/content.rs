//! Structured slide content returned by the generation capability.
//!
//! Field names follow the JSON the model is asked to produce: the text body
//! travels as `content` and the table as `table_data`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Title plus newline-delimited body lines (no bullet glyphs).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSlideContent {
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(rename = "content", default, deserialize_with = "nullable_string")]
    pub body: String,
}

impl TextSlideContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Tabular data. The column count is `headers.len()`; rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableContent {
    #[serde(default, deserialize_with = "cell_row")]
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "cell_rows")]
    pub rows: Vec<Vec<String>>,
}

impl TableContent {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// Title plus a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSlideContent {
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(rename = "table_data")]
    pub table: TableContent,
}

impl TableSlideContent {
    pub fn new(title: impl Into<String>, table: TableContent) -> Self {
        Self {
            title: title.into(),
            table,
        }
    }
}

/// Content generated for one plan item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideContent {
    Text(TextSlideContent),
    Table(TableSlideContent),
}

impl SlideContent {
    pub fn title(&self) -> &str {
        match self {
            SlideContent::Text(c) => &c.title,
            SlideContent::Table(c) => &c.title,
        }
    }
}

impl From<TextSlideContent> for SlideContent {
    fn from(content: TextSlideContent) -> Self {
        SlideContent::Text(content)
    }
}

impl From<TableSlideContent> for SlideContent {
    fn from(content: TableSlideContent) -> Self {
        SlideContent::Table(content)
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Renders a JSON scalar as cell text. Models sometimes emit numbers or
/// booleans in tables; those keep their JSON spelling, null becomes empty.
fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn cell_row<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let cells = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(cells.into_iter().map(cell_text).collect())
}

fn cell_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Option<Vec<Value>>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(rows
        .into_iter()
        .map(|row| row.unwrap_or_default().into_iter().map(cell_text).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_content_reads_body_from_content_key() {
        let content: TextSlideContent = serde_json::from_value(json!({
            "title": "Intro Title",
            "content": "Line one\nLine two"
        }))
        .unwrap();
        assert_eq!(content, TextSlideContent::new("Intro Title", "Line one\nLine two"));
    }

    #[test]
    fn null_text_fields_become_empty() {
        let content: TextSlideContent =
            serde_json::from_value(json!({"title": null, "content": null})).unwrap();
        assert_eq!(content.title, "");
        assert_eq!(content.body, "");
    }

    #[test]
    fn table_cells_accept_scalars() {
        let content: TableSlideContent = serde_json::from_value(json!({
            "title": "Plans",
            "table_data": {
                "headers": ["Plan", "Price", "Support"],
                "rows": [["Basic", 10, false], ["Pro", 12.5, null]]
            }
        }))
        .unwrap();

        assert_eq!(content.table.column_count(), 3);
        assert_eq!(content.table.rows[0], vec!["Basic", "10", "false"]);
        assert_eq!(content.table.rows[1], vec!["Pro", "12.5", ""]);
    }

    #[test]
    fn table_without_rows_is_header_only() {
        let content: TableSlideContent = serde_json::from_value(json!({
            "title": "Empty",
            "table_data": {"headers": ["A"]}
        }))
        .unwrap();
        assert!(content.table.rows.is_empty());
    }

    #[test]
    fn table_slide_requires_table_data() {
        let result = serde_json::from_value::<TableSlideContent>(json!({"title": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn slide_content_exposes_title() {
        let text: SlideContent = TextSlideContent::new("T", "b").into();
        let table: SlideContent = TableSlideContent::new("U", TableContent::default()).into();
        assert_eq!(text.title(), "T");
        assert_eq!(table.title(), "U");
    }
}
