//! # sdocheck engine
//!
//! Semantic verification of schema.org JSON-LD annotations.
//!
//! A verification runs these phases in order, each one allowed to stop the
//! run early:
//! - lexical analysis of the raw input ([`lexical`])
//! - `@context` validation ([`context`])
//! - anomaly scan for `undefined`, `null` and nested arrays ([`anomaly`])
//! - JSON-LD normalization onto `schema:` terms ([`normalizer`], [`compactor`])
//! - structural checks on `@type` ([`structure`])
//! - vocabulary conformance: types, properties, domains and ranges ([`conformance`])
//!
//! ```no_run
//! use sdocheck_engine::Verifier;
//! use sdocheck_vocab::SchemaVocabulary;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let vocabulary = SchemaVocabulary::from_path("schemaorg-current-https.jsonld")?;
//! let verifier = Verifier::new(Arc::new(vocabulary));
//! let report = verifier
//!     .validate(r#"{"@context": "https://schema.org/", "@type": "Person", "name": "Anna"}"#)
//!     .await;
//! println!("{}", report.to_simple_string());
//! # Ok(())
//! # }
//! ```

pub mod anomaly;
pub mod compactor;
pub mod config;
pub mod conformance;
pub mod context;
pub mod datatypes;
pub mod engine;
pub mod error;
pub mod input;
pub mod lexical;
pub mod normalizer;
pub mod structure;

pub use compactor::{CompactionError, Compactor, SchemaCompactor, SyntaxError};
pub use config::{ConfigError, VerifierConfig};
pub use conformance::ConformanceChecker;
pub use engine::Verifier;
pub use error::{EngineError, EngineResult};
pub use input::InputValue;
pub use normalizer::Normalizer;
