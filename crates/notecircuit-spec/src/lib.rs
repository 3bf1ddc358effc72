//! notecircuit Note Model Library
//!
//! This crate provides the input types, validation, and hashing shared by the
//! notecircuit compiler and CLI. Inputs are JSON documents holding a
//! time-ordered list of note events.
//!
//! # Example
//!
//! ```
//! use notecircuit_spec::{EmitterKind, Note, NoteSequence};
//! use notecircuit_spec::validation::validate_sequence;
//! use notecircuit_spec::hash::canonical_sequence_hash;
//!
//! let seq = NoteSequence::new(vec![
//!     Note::new(0, 20, 12),
//!     Note::new(40, 20, 7).with_kind(EmitterKind::Bass),
//! ]);
//!
//! let result = validate_sequence(&seq);
//! assert!(result.is_ok());
//!
//! let hash = canonical_sequence_hash(&seq).unwrap();
//! assert_eq!(hash.len(), 64);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation
//! - [`hash`]: Canonical hashing of inputs and outputs
//! - [`note`]: Note, emitter kind, and emitter variant types
//! - [`report`]: Report types and builder for compile results
//! - [`validation`]: Note sequence validation

pub mod error;
pub mod hash;
pub mod note;
pub mod report;
pub mod validation;

pub use error::{
    BackendError, ErrorCode, SpecError, ValidationError, ValidationResult,
    ValidationWarning, WarningCode,
};
pub use hash::{blake3_hash, blake3_hash_str, canonical_sequence_hash};
pub use note::{
    EmitterKind, EmitterVariant, Note, NoteField, NoteFieldError, NoteSequence,
    MAX_TIMER_SECONDS, OVERLAP_TOLERANCE_TICKS, PITCH_CLASS_MAX, PITCH_CLASS_MIN,
    TICKS_PER_SECOND,
};
pub use report::{
    CircuitStats, OutputResult, Report, ReportBuilder, ReportError, ReportWarning,
    REPORT_VERSION,
};
pub use validation::{validate_json, validate_notes, validate_sequence};
