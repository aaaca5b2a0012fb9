//! Engine error types

use crate::compactor::CompactionError;
use crate::config::ConfigError;
use sdocheck_vocab::VocabError;

/// Failures inside the pipeline.
///
/// None of these reach the caller of [`crate::Verifier::validate`]; they are
/// turned into a code 999 entry of the report.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("The annotation exceeds the maximum nesting depth of {limit}.")]
    DepthLimitExceeded { limit: usize },

    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] VocabError),

    #[error("Compaction error: {0}")]
    Compaction(#[from] CompactionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;
