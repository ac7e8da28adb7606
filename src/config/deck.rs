//! Deck generation configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Template, styling and pacing for generated decks
#[derive(Debug, Clone, Deserialize)]
pub struct DeckConfig {
    /// `.pptx` base template; the built-in template is used when unset
    pub template_path: Option<PathBuf>,

    /// Index of the slide layout every slide is created from
    #[serde(default)]
    pub layout_index: usize,

    /// Font applied to every run
    #[serde(default = "default_font_name")]
    pub font_name: String,

    /// Delay between consecutive slide generation calls
    #[serde(default = "default_pacing_interval")]
    pub pacing_interval_ms: u64,

    /// File name offered in the download response
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
}

impl DeckConfig {
    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_interval_ms)
    }

    /// Validate deck configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.font_name.trim().is_empty() {
            return Err(ValidationError::EmptyFontName);
        }
        let name = self.output_filename.trim();
        if !name.ends_with(".pptx") || name.len() == ".pptx".len() || name.contains(['"', '/', '\\']) {
            return Err(ValidationError::InvalidOutputFilename);
        }
        Ok(())
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            template_path: None,
            layout_index: 0,
            font_name: default_font_name(),
            pacing_interval_ms: default_pacing_interval(),
            output_filename: default_output_filename(),
        }
    }
}

fn default_font_name() -> String {
    "BIZ UDPGothic".to_string()
}

fn default_pacing_interval() -> u64 {
    1000
}

fn default_output_filename() -> String {
    "generated_presentation.pptx".to_string()
}
