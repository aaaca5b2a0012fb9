//! Verification report data model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Family an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    JsonError,
    JsonLdError,
    AnnotationError,
    ExecutionError,
}

/// Severity of a detected problem, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Errors and critical errors invalidate an annotation, warnings do not
    pub fn is_blocking(self) -> bool {
        matches!(self, Severity::Error | Severity::Critical)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::JsonError => "JsonError",
            ErrorKind::JsonLdError => "JsonLdError",
            ErrorKind::AnnotationError => "AnnotationError",
            ErrorKind::ExecutionError => "ExecutionError",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// One detected problem of an annotation.
///
/// Entries are built once through [`ErrorEntry::new`] (plus an optional
/// [`ErrorEntry::with_value`]) and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEntry {
    kind: ErrorKind,
    severity: Severity,
    error_code: u16,
    name: String,
    description: String,
    annotation_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl ErrorEntry {
    pub fn new(
        kind: ErrorKind,
        severity: Severity,
        error_code: u16,
        name: impl Into<String>,
        description: impl Into<String>,
        annotation_path: Option<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            error_code,
            name: name.into(),
            description: description.into(),
            annotation_path,
            value: None,
        }
    }

    /// Attach the offending literal. Empty values (`null`, `false`, `0`, `""`)
    /// are not recorded.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.value = if is_empty_literal(&value) { None } else { Some(value) };
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn error_code(&self) -> u16 {
        self.error_code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn annotation_path(&self) -> Option<&str> {
        self.annotation_path.as_deref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

fn is_empty_literal(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Overall outcome of one verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationResult {
    Valid,
    ValidWithWarnings,
    Invalid,
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerificationResult::Valid => "Valid",
            VerificationResult::ValidWithWarnings => "ValidWithWarnings",
            VerificationResult::Invalid => "Invalid",
        };
        f.write_str(s)
    }
}

pub const DESCRIPTION_VALID: &str = "The annotation is a valid Schema.org annotation.";
pub const DESCRIPTION_VALID_WITH_WARNINGS: &str = "The annotation is valid, but with warnings.";
pub const DESCRIPTION_INVALID: &str = "The annotation is invalid.";
pub const DESCRIPTION_LEXICAL_ABORT: &str = "There was a lexical problem with the annotation.";
pub const DESCRIPTION_CONTEXT_ABORT: &str = "There was a problem with the @context of the annotation.";
pub const DESCRIPTION_EXECUTION_ABORT: &str =
    "There was an execution error during the verification process, make sure the sent annotation has a valid serialization.";

/// Final report of a verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    verification_result: VerificationResult,
    description: String,
    errors: Vec<ErrorEntry>,
}

impl VerificationReport {
    /// Derive the report of a completed run from its error list
    pub fn from_errors(errors: Vec<ErrorEntry>) -> Self {
        let (verification_result, description) = if errors.is_empty() {
            (VerificationResult::Valid, DESCRIPTION_VALID)
        } else if errors.iter().any(|e| e.severity().is_blocking()) {
            (VerificationResult::Invalid, DESCRIPTION_INVALID)
        } else {
            (VerificationResult::ValidWithWarnings, DESCRIPTION_VALID_WITH_WARNINGS)
        };

        Self {
            verification_result,
            description: description.to_string(),
            errors,
        }
    }

    /// Report of a run that stopped before all phases completed
    pub fn aborted(description: impl Into<String>, errors: Vec<ErrorEntry>) -> Self {
        Self {
            verification_result: VerificationResult::Invalid,
            description: description.into(),
            errors,
        }
    }

    pub fn verification_result(&self) -> VerificationResult {
        self.verification_result
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ErrorEntry> {
        self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.verification_result != VerificationResult::Invalid
    }

    /// Number of entries with `Error` severity
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of entries with `Warning` severity
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Number of entries with `Critical` severity
    pub fn critical_count(&self) -> usize {
        self.count(Severity::Critical)
    }

    fn count(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity() == severity).count()
    }

    /// Human readable rendering
    pub fn to_simple_string(&self) -> String {
        let mut output = format!("Verification Report: {}\n{}\n", self.verification_result, self.description);

        for (i, error) in self.errors.iter().enumerate() {
            output.push_str(&format!(
                "\n{}. [{} {}] {} ({})\n",
                i + 1,
                error.severity(),
                error.error_code(),
                error.name(),
                error.kind()
            ));
            output.push_str(&format!("   {}\n", error.description()));

            if let Some(path) = error.annotation_path() {
                output.push_str(&format!("   Path: {}\n", path));
            }

            if let Some(value) = error.value() {
                output.push_str(&format!("   Value: {}\n", value));
            }
        }

        output
    }
}
