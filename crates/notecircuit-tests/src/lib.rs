//! notecircuit End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the flows that must not drift:
//!
//! - Compilation: note file -> circuit document
//! - CLI: validate, compile, and inspect against real files
//! - **Determinism**: byte-identical documents across runs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p notecircuit-tests
//! ```
//!
//! ## Determinism Testing
//!
//! ```
//! use notecircuit_spec::Note;
//! use notecircuit_tests::determinism::verify_determinism;
//!
//! let notes = [Note::new(0, 2400, 3)];
//! let result = verify_determinism(
//!     || notecircuit_backend_circuit::compile(&notes).unwrap().json,
//!     3,
//! );
//! assert!(result.is_deterministic);
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{
    assert_deterministic, compute_hash, verify_determinism, verify_hash_determinism,
    DeterminismError, DeterminismFixture, DeterminismReport, DeterminismResult,
};
pub use fixtures::NoteFixtures;
