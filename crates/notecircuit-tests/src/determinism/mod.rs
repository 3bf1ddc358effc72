//! Determinism testing framework for notecircuit.
//!
//! Compiling the same note sequence must always yield the same document
//! bytes: identifiers are assigned by a fixed layout pass, the trigger's
//! wiring follows note order, and map iteration never reaches the output.
//! This module provides tools to check that across:
//!
//! - Multiple runs of the same compile call
//! - Multiple note files in batch
//!
//! # Example
//!
//! ```
//! use notecircuit_spec::Note;
//! use notecircuit_tests::determinism::verify_determinism;
//!
//! let notes = [Note::new(0, 20, 1), Note::new(5000, 20, 2)];
//! let result = verify_determinism(
//!     || notecircuit_backend_circuit::compile(&notes).unwrap().json,
//!     3,
//! );
//! assert!(result.is_deterministic);
//! ```

pub mod core;
pub mod fixture;
#[macro_use]
pub mod macros;
pub mod report;

pub use core::{
    assert_deterministic, compute_hash, verify_determinism, verify_hash_determinism,
    DeterminismResult, DiffInfo,
};
pub use fixture::DeterminismFixture;
pub use report::{DeterminismError, DeterminismReport, DeterminismReportEntry};
