//! notecircuit Circuit Backend - Deterministic Note-to-Circuit Compilation
//!
//! This crate turns a time-ordered list of notes into a circuit document for a
//! block-based logic runtime: emitters that sound the notes, timers that
//! schedule them, logic gates that gate each sound window, and one trigger
//! that starts playback.
//!
//! # Pipeline
//!
//! - **Resource allocation**: each note is assigned to an emitter of its
//!   `(kind, variant, pitch_class)` class; notes on one emitter never overlap,
//!   counting a one-tick release gap.
//! - **Timer synthesis**: each note gets a start timer (shared between notes of
//!   one emitter with equal start and duration) and its own duration timer.
//!   Values beyond 60 seconds hang from a shared chain of 60-second extension
//!   timers.
//! - **Graph building**: every entity becomes a node with an id assigned in
//!   emission order, linked to the nodes it drives, and wrapped in the
//!   document envelope.
//!
//! # Determinism
//!
//! Compilation is pure: the same notes always produce byte-identical JSON.
//! [`CompileResult::hash`] is the BLAKE3 hash of that JSON.
//!
//! # Example
//!
//! ```
//! use notecircuit_backend_circuit::compile;
//! use notecircuit_spec::Note;
//!
//! let result = compile(&[Note::new(0, 20, 12)]).unwrap();
//! assert_eq!(result.stats.emitters, 1);
//! assert_eq!(result.document.node_count(), 7);
//! assert!(result.json.starts_with(r#"{"bodies":[{"childs":["#));
//! ```
//!
//! # Module Structure
//!
//! - [`context`]: Run-scoped pools and handles
//! - [`allocator`]: Emitter assignment
//! - [`timer`]: Start, duration, and extension timers
//! - [`graph`]: Node model, layout, and document envelope
//! - [`compile`](mod@compile): Entry points and errors

pub mod allocator;
pub mod compile;
pub mod context;
pub mod graph;
pub mod timer;

pub use allocator::Emitter;
pub use compile::{
    build, compile, compile_with, minimum_node_count, CompileError, CompileResult,
};
pub use context::{CompileContext, EmitterId, NoteId, PlacedNote};
pub use graph::{build_document, trigger_timers, Document, GraphNode, NodeId};
pub use timer::{decompose, extension_chain_len, needs_extension, Timer, TimerRef, TimerRole};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier for reports.
pub const BACKEND_ID: &str = "notecircuit-backend-circuit";
