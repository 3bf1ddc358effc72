//! Error types for note validation and processing.
//!
//! Validation collects [`ValidationError`]s and [`ValidationWarning`]s into a
//! [`ValidationResult`] so that every problem in a file can be reported at
//! once. Operations that stop at the first failure use [`SpecError`] here and
//! [`BackendError`] implementors in the backends.

use std::fmt;
use thiserror::Error;

/// Error codes for note sequence validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Negative start tick
    InvalidStartTick,
    /// E002: Zero or negative duration
    InvalidDurationTick,
    /// E003: Pitch class outside the supported range
    PitchClassOutOfRange,
    /// E004: Note starts before its predecessor
    UnorderedNotes,
    /// E005: Input could not be parsed as a note sequence
    MalformedInput,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidStartTick => "E001",
            ErrorCode::InvalidDurationTick => "E002",
            ErrorCode::PitchClassOutOfRange => "E003",
            ErrorCode::UnorderedNotes => "E004",
            ErrorCode::MalformedInput => "E005",
        }
    }
}

/// Warning codes for note sequence validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Sequence has no notes
    EmptySequence,
    /// W002: Note needs chained extension timers
    ExtensionRequired,
    /// W003: Note is an exact duplicate of an earlier one
    DuplicateNote,
}

impl WarningCode {
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::EmptySequence => "W001",
            WarningCode::ExtensionRequired => "W002",
            WarningCode::DuplicateNote => "W003",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A validation error: code, message, and the JSON path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub message: String,
    /// For example `notes[3].duration_tick`.
    pub path: Option<String>,
}

impl ValidationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(code, message)
        }
    }
}

/// A validation warning. Warnings never block compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: WarningCode,
    pub message: String,
    pub path: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(code, message)
        }
    }
}

fn write_diagnostic(
    f: &mut fmt::Formatter<'_>,
    code: &str,
    message: &str,
    path: Option<&str>,
) -> fmt::Result {
    match path {
        Some(path) => write!(f, "{}: {} (at {})", code, message, path),
        None => write!(f, "{}: {}", code, message),
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_diagnostic(f, self.code.code(), &self.message, self.path.as_deref())
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_diagnostic(f, self.code.code(), &self.message, self.path.as_deref())
    }
}

impl std::error::Error for ValidationError {}

/// Errors from reading or writing note sequences.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Everything validation found in one sequence.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// A result holding a single error.
    pub fn failure(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors; warnings are allowed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Common trait for backend errors.
///
/// The CLI reports backend failures through this trait so that it never
/// matches on backend-specific enums.
pub trait BackendError: std::error::Error {
    /// Stable code for reporting, like "CIRCUIT_001".
    fn code(&self) -> &'static str;

    fn message(&self) -> String {
        self.to_string()
    }

    /// Category for grouping related errors.
    fn category(&self) -> &'static str;
}
