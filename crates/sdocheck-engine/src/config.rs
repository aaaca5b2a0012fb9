//! Verifier configuration

use sdocheck_core::fuzzy::{DEFAULT_EARLY_ABORT, DEFAULT_MAX_DISTANCE, DEFAULT_MAX_SUGGESTIONS};
use sdocheck_core::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tuning knobs of a [`crate::Verifier`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Deepest object/array nesting accepted before the run is aborted
    pub max_depth: usize,
    /// Suggestions listed in a misspelling error
    pub max_suggestions: usize,
    /// Terms strictly closer than this are suggested
    pub suggestion_distance: usize,
    /// Edit distance computation gives up above this diagonal value
    pub early_abort_distance: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            suggestion_distance: DEFAULT_MAX_DISTANCE,
            early_abort_distance: DEFAULT_EARLY_ABORT,
        }
    }
}

impl VerifierConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn fuzzy_matcher(&self) -> FuzzyMatcher {
        FuzzyMatcher::new(self.suggestion_distance, self.max_suggestions, self.early_abort_distance)
    }
}
