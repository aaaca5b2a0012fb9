//! # sdocheck - schema.org annotation verifier
//!
//! sdocheck checks schema.org annotations written in JSON-LD for
//! compliance with the schema.org vocabulary and reports every problem with
//! a code, a severity and the path of the offending node.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sdocheck::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let vocabulary = SchemaVocabulary::from_path("schemaorg-current-https.jsonld")?;
//!     let verifier = Verifier::new(Arc::new(vocabulary));
//!
//!     let report = verifier
//!         .validate(r#"{"@context": "https://schema.org/", "@type": "Persn", "name": "Anna"}"#)
//!         .await;
//!
//!     println!("{}", report.to_simple_string());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`sdocheck-core`**: report model, error catalog, annotation paths, fuzzy matching
//! - **`sdocheck-vocab`**: schema.org vocabulary graph and loader
//! - **`sdocheck-engine`**: verification pipeline and the `Verifier` entry point
//! - **`sdocheck-cli`**: the `sdocheck` command-line tool
//!
//! ## Feature Flags
//!
//! - `full` (default): all crates plus the bundled vocabulary
//! - `core`: only the report model
//! - `vocab`: vocabulary graph
//! - `engine`: verification pipeline
//! - `cli`: command-line handlers
//! - `bundled`: reduced schema.org vocabulary compiled in

#[cfg(feature = "sdocheck-core")]
pub use sdocheck_core as core;

#[cfg(feature = "sdocheck-vocab")]
pub use sdocheck_vocab as vocab;

#[cfg(feature = "sdocheck-engine")]
pub use sdocheck_engine as engine;

#[cfg(feature = "sdocheck-cli")]
pub use sdocheck_cli as cli;

// Convenience re-exports for common types (feature-gated)
#[cfg(feature = "sdocheck-core")]
pub use sdocheck_core::{AnnotationPath, ErrorEntry, ErrorKind, Severity, VerificationReport, VerificationResult};

#[cfg(feature = "sdocheck-vocab")]
pub use sdocheck_vocab::{SchemaVocabulary, VocabError, Vocabulary};

#[cfg(feature = "sdocheck-engine")]
pub use sdocheck_engine::{EngineError, InputValue, Verifier, VerifierConfig};

// Commonly used external dependencies
pub use anyhow;
pub use serde;
pub use serde_json;
pub use tokio;

/// Prelude module for convenient imports
///
/// ```rust
/// use sdocheck::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "sdocheck-core")]
    pub use crate::{AnnotationPath, ErrorEntry, ErrorKind, Severity, VerificationReport, VerificationResult};

    #[cfg(feature = "sdocheck-vocab")]
    pub use crate::{SchemaVocabulary, Vocabulary};

    #[cfg(feature = "sdocheck-engine")]
    pub use crate::{InputValue, Verifier, VerifierConfig};

    #[cfg(feature = "bundled")]
    pub use sdocheck_vocab::bundled::reduced_vocabulary;

    // Common external types
    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
    pub use tokio;
}

/// Current version of sdocheck
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Basic status information: version and the crates compiled in
pub fn health_check() -> serde_json::Value {
    serde_json::json!({
        "status": "healthy",
        "version": VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "modules": {
            "core": cfg!(feature = "sdocheck-core"),
            "vocab": cfg!(feature = "sdocheck-vocab"),
            "engine": cfg!(feature = "sdocheck-engine"),
            "cli": cfg!(feature = "sdocheck-cli"),
            "bundled_vocabulary": cfg!(feature = "bundled")
        }
    })
}
