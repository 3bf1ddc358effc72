//! Report types and builder for compile and validation results.
//!
//! A report documents one `notecircuit compile` or `notecircuit validate` run:
//! the input hash, errors and warnings, the written document (if any), circuit
//! statistics, and the toolchain that produced it.

use crate::error::{ValidationError, ValidationWarning};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Report schema version.
pub const REPORT_VERSION: u32 = 1;

/// A complete report for a compile or validation operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (always 1).
    pub report_version: u32,
    /// Hex-encoded BLAKE3 hash of the canonicalized note sequence.
    pub input_hash: String,
    /// Whether the operation succeeded without errors.
    pub ok: bool,
    /// List of errors that occurred.
    pub errors: Vec<ReportError>,
    /// List of warnings that were generated.
    pub warnings: Vec<ReportWarning>,
    /// Documents written by the operation.
    pub outputs: Vec<OutputResult>,
    /// Circuit statistics (compile runs only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<CircuitStats>,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    /// Backend identifier and version (e.g., "notecircuit-backend-circuit v0.1.0").
    pub backend_version: String,
    /// Rust target triple (e.g., "x86_64-unknown-linux-gnu").
    pub target_triple: String,
}

impl Report {
    /// Serializes the report to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Report filename for a document stem.
    ///
    /// ```
    /// use notecircuit_spec::report::Report;
    ///
    /// assert_eq!(Report::filename("song"), "song.report.json");
    /// ```
    pub fn filename(stem: &str) -> String {
        format!("{}.report.json", stem)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Error entry in a report: a validation code (`E001`) or an operation code
/// (`CIRCUIT_002`, `CLI_003`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportError {
    pub code: String,
    pub message: String,
    /// JSON path of the offending field, for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ReportError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }
}

impl From<&ValidationError> for ReportError {
    fn from(err: &ValidationError) -> Self {
        Self {
            code: err.code.code().to_string(),
            message: err.message.clone(),
            path: err.path.clone(),
        }
    }
}

/// Warning entry in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWarning {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl From<&ValidationWarning> for ReportWarning {
    fn from(warn: &ValidationWarning) -> Self {
        Self {
            code: warn.code.code().to_string(),
            message: warn.message.clone(),
            path: warn.path.clone(),
        }
    }
}

/// A document written by a compile run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputResult {
    pub path: PathBuf,
    /// Hex-encoded BLAKE3 hash of the document bytes.
    pub hash: String,
    pub bytes: u64,
}

impl OutputResult {
    pub fn new(path: PathBuf, hash: String, bytes: u64) -> Self {
        Self { path, hash, bytes }
    }
}

/// Component counts of a compiled circuit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitStats {
    pub notes: usize,
    pub emitters: usize,
    /// One per note; duration timers are never shared.
    pub duration_timers: usize,
    /// Distinct start timers after reuse.
    pub start_timers: usize,
    /// Chained 60-second extension timers.
    pub extension_timers: usize,
    /// OR, AND, and NOR gates.
    pub logic_gates: usize,
    /// Total graph nodes, including the trigger.
    pub nodes: usize,
}

/// Fluent builder for [`Report`].
///
/// ```
/// use notecircuit_spec::report::ReportBuilder;
///
/// let report = ReportBuilder::new(
///     "a1b2c3d4".to_string(),
///     "notecircuit-backend-circuit v0.1.0".to_string(),
/// )
/// .duration_ms(12)
/// .build();
/// assert!(report.ok);
/// ```
#[derive(Debug)]
pub struct ReportBuilder {
    report: Report,
}

impl ReportBuilder {
    pub fn new(input_hash: String, backend_version: String) -> Self {
        Self {
            report: Report {
                report_version: REPORT_VERSION,
                input_hash,
                ok: true,
                errors: Vec::new(),
                warnings: Vec::new(),
                outputs: Vec::new(),
                stats: None,
                duration_ms: 0,
                backend_version,
                target_triple: target_triple(),
            },
        }
    }

    /// Overrides the ok flag. Adding an error already clears it.
    pub fn ok(mut self, ok: bool) -> Self {
        self.report.ok = ok;
        self
    }

    pub fn error(mut self, error: ReportError) -> Self {
        self.report.errors.push(error);
        self.report.ok = false;
        self
    }

    pub fn validation_errors(self, errors: &[ValidationError]) -> Self {
        errors
            .iter()
            .fold(self, |builder, err| builder.error(err.into()))
    }

    pub fn validation_warnings(mut self, warnings: &[ValidationWarning]) -> Self {
        self.report
            .warnings
            .extend(warnings.iter().map(ReportWarning::from));
        self
    }

    pub fn output(mut self, output: OutputResult) -> Self {
        self.report.outputs.push(output);
        self
    }

    pub fn stats(mut self, stats: CircuitStats) -> Self {
        self.report.stats = Some(stats);
        self
    }

    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.report.duration_ms = ms;
        self
    }

    pub fn build(self) -> Report {
        self.report
    }
}

/// Best-effort target triple of the running binary, like `x86_64-unknown-linux-gnu`.
fn target_triple() -> String {
    use std::env::consts::{ARCH, OS};

    let vendor = match OS {
        "windows" => "pc",
        "macos" | "ios" => "apple",
        _ => "unknown",
    };
    let os = if OS == "macos" { "darwin" } else { OS };
    let env = if cfg!(target_env = "msvc") {
        "-msvc"
    } else if cfg!(target_env = "gnu") {
        "-gnu"
    } else if cfg!(target_env = "musl") {
        "-musl"
    } else {
        ""
    };
    format!("{}-{}-{}{}", ARCH, vendor, os, env)
}
