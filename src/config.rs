//! Runtime configuration for evaluation and batch processing.

use crate::error::SourceError;
use crate::evaluator::DEFAULT_MAX_TOKENS;
use crate::rational::RenderStyle;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How values are written in reports and result files
    pub render: RenderStyle,
    /// Inserted before `.txt` when naming companion result files
    pub result_suffix: String,
    /// Longest expression line, in tokens, the evaluator accepts
    pub max_tokens: usize,
    /// Level for the command-line log subscriber (`error` .. `trace`)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            render: RenderStyle::Canonical,
            result_suffix: "_result".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration; missing keys take defaults.
    pub fn from_json(text: &str) -> Result<Config, SourceError> {
        let config: Config = serde_json::from_str(text)?;
        config.log_level()?;
        Ok(config)
    }

    /// The configured `log_level` as a `tracing` level.
    pub fn log_level(&self) -> Result<Level, SourceError> {
        Level::from_str(&self.log_level)
            .map_err(|_| SourceError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn load(path: &Path) -> Result<Config, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_json(&text)
    }
}
