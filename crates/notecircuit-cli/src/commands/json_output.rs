//! JSON output types for machine-readable CLI output.
//!
//! Every command run with `--json` prints exactly one of these objects to
//! stdout and nothing else.

use notecircuit_spec::{
    BackendError, CircuitStats, OutputResult, ValidationError, ValidationWarning,
};
use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// Format: CLI_XXX for CLI-level errors; validation (`E0XX`) and compiler
/// (`CIRCUIT_XXX`) codes pass through unchanged.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Note file is not valid JSON or has unknown fields
    pub const JSON_PARSE: &str = "CLI_002";
    /// Compiled circuit exceeds the `--max-nodes` budget
    pub const NODE_BUDGET: &str = "CLI_003";
    /// Output or report file could not be written
    pub const OUTPUT_WRITE: &str = "CLI_004";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "E002", "CIRCUIT_002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn from_validation(err: &ValidationError) -> Self {
        Self {
            code: err.code.code().to_string(),
            message: err.message.clone(),
            path: err.path.clone(),
        }
    }

    pub fn from_backend<E: BackendError>(err: &E) -> Self {
        Self::new(err.code(), err.message())
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonWarning {
    pub fn from_validation(warn: &ValidationWarning) -> Self {
        Self {
            code: warn.code.code().to_string(),
            message: warn.message.clone(),
            path: warn.path.clone(),
        }
    }
}

/// Output of `validate --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidateOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    /// BLAKE3 hash of the input file content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_count: Option<usize>,
}

/// Output of `compile --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompileOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_hash: Option<String>,
    /// Written circuit document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CircuitStats>,
    /// Path of the report file, unless `--no-report` was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
    pub duration_ms: u64,
}

/// One timer wired to the trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerTarget {
    /// Pool and index, e.g. "start[0]" or "extension[0]"
    pub timer: String,
    /// Node id in the compiled document
    pub node: u32,
}

/// Output of `inspect --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InspectOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CircuitStats>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trigger: Vec<TriggerTarget>,
    /// BLAKE3 hash of the compact document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_hash: Option<String>,
}
