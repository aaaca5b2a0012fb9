//! Verification entry point

use crate::anomaly;
use crate::compactor::{Compactor, SchemaCompactor};
use crate::conformance::ConformanceChecker;
use crate::config::VerifierConfig;
use crate::context;
use crate::error::{EngineError, EngineResult};
use crate::input::InputValue;
use crate::lexical;
use crate::normalizer::{map_compaction_error, Normalizer};
use crate::structure;
use futures::future::join_all;
use sdocheck_core::{
    catalog, ErrorEntry, VerificationReport, DESCRIPTION_CONTEXT_ABORT, DESCRIPTION_EXECUTION_ABORT,
    DESCRIPTION_LEXICAL_ABORT,
};
use sdocheck_vocab::Vocabulary;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Verifies schema.org annotations against one vocabulary snapshot.
///
/// Cheap to clone and safe to share between tasks; nothing is mutated
/// during a verification.
#[derive(Debug, Clone)]
pub struct Verifier {
    vocabulary: Arc<dyn Vocabulary>,
    normalizer: Normalizer,
    config: VerifierConfig,
}

/// How a run ended early
enum Abort {
    /// Report with this description and the errors collected so far
    Report(&'static str),
    /// Internal failure, appended as a code 999 entry
    Failure(EngineError),
}

impl From<EngineError> for Abort {
    fn from(error: EngineError) -> Self {
        Abort::Failure(error)
    }
}

impl Verifier {
    /// Verifier with the default configuration and the built-in compaction
    pub fn new(vocabulary: Arc<dyn Vocabulary>) -> Self {
        Self {
            vocabulary,
            normalizer: Normalizer::new(Arc::new(SchemaCompactor::new())),
            config: VerifierConfig::default(),
        }
    }

    pub fn with_config(vocabulary: Arc<dyn Vocabulary>, config: VerifierConfig) -> EngineResult<Self> {
        Self::with_compactor(vocabulary, Arc::new(SchemaCompactor::new()), config)
    }

    /// Verifier using another JSON-LD compaction implementation
    pub fn with_compactor(
        vocabulary: Arc<dyn Vocabulary>,
        compactor: Arc<dyn Compactor>,
        config: VerifierConfig,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            vocabulary,
            normalizer: Normalizer::new(compactor),
            config,
        })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Arc<dyn Vocabulary> {
        &self.vocabulary
    }

    /// Verify one annotation.
    ///
    /// Accepts the raw annotation text or an already parsed value. Never
    /// fails: internal problems show up as code 999 entries of the report.
    pub async fn validate(&self, input: impl Into<InputValue>) -> VerificationReport {
        info!("Starting verification");

        let mut errors = Vec::new();
        let report = match self.run(input.into(), &mut errors).await {
            Ok(()) => VerificationReport::from_errors(errors),
            Err(Abort::Report(description)) => {
                warn!("Verification stopped: {}", description);
                VerificationReport::aborted(description, errors)
            }
            Err(Abort::Failure(error)) => {
                warn!("Verification failed: {}", error);
                errors.push(failure_entry(&error));
                VerificationReport::aborted(DESCRIPTION_EXECUTION_ABORT, errors)
            }
        };

        info!(
            "Verification complete: {} ({} entries)",
            report.verification_result(),
            report.errors().len()
        );
        report
    }

    /// Verify several candidates concurrently; reports keep the input order
    pub async fn validate_all<I, T>(&self, inputs: I) -> Vec<VerificationReport>
    where
        I: IntoIterator<Item = T>,
        T: Into<InputValue>,
    {
        join_all(inputs.into_iter().map(|input| self.validate(input))).await
    }

    async fn run(&self, input: InputValue, errors: &mut Vec<ErrorEntry>) -> Result<(), Abort> {
        let annotation = match lexical::analyze(input) {
            Ok(annotation) => annotation,
            Err(entry) => {
                errors.push(entry);
                return Err(Abort::Report(DESCRIPTION_LEXICAL_ABORT));
            }
        };

        let document = annotation.to_json();
        let context_check = context::check(&document);
        errors.extend(context_check.errors);
        if !context_check.present {
            return Err(Abort::Report(DESCRIPTION_CONTEXT_ABORT));
        }
        debug!("Context checked, {} entries so far", errors.len());

        let max_depth = self.config.max_depth;
        if annotation.depth() > max_depth {
            return Err(EngineError::DepthLimitExceeded { limit: max_depth }.into());
        }

        errors.extend(anomaly::scan(&annotation, max_depth)?);
        debug!("Anomaly scan done, {} entries so far", errors.len());

        let normalized = match self.normalizer.normalize(&document).await {
            Ok(normalized) => normalized,
            Err(error) => {
                warn!("Compaction failed: {}", error);
                if let Some(entry) = map_compaction_error(&error, errors.as_slice()) {
                    errors.push(entry);
                }
                return Err(Abort::Report(DESCRIPTION_EXECUTION_ABORT));
            }
        };
        debug!("Normalized annotation: {}", normalized);

        errors.extend(structure::check(&normalized, max_depth)?);
        errors.extend(self.check_conformance(&normalized)?);
        Ok(())
    }

    fn check_conformance(&self, normalized: &Value) -> EngineResult<Vec<ErrorEntry>> {
        let checker = ConformanceChecker::new(self.vocabulary.as_ref(), self.config.fuzzy_matcher(), self.config.max_depth);
        let errors = checker.check(normalized)?;
        debug!("Conformance check found {} entries", errors.len());
        Ok(errors)
    }
}

fn failure_entry(error: &EngineError) -> ErrorEntry {
    match error {
        EngineError::DepthLimitExceeded { .. } => catalog::execution_error(error.to_string()),
        _ => catalog::generic_execution_error(),
    }
}
