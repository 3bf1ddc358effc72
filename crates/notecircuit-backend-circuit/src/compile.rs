//! Compilation entry point.
//!
//! Runs the allocator and the timer synthesizer over the notes, then the
//! graph builder over the resulting context, and serializes the document.

use notecircuit_spec::{
    blake3_hash_str, BackendError, CircuitStats, Note, NoteField, NoteFieldError,
};
use thiserror::Error;

use crate::context::CompileContext;
use crate::graph::{build_document, Document};
use crate::timer::{extension_chain_len, TimerRef};

/// Errors raised while compiling notes into a circuit.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A note field is out of range.
    #[error("note {index}: {field} {}, got {value}", .field.requirement())]
    InvalidNote {
        /// Position of the note in the input.
        index: usize,
        /// The offending field.
        field: NoteField,
        /// The offending value.
        value: i64,
    },

    /// A note starts before the one preceding it.
    #[error("note {index} starts at tick {start_tick}, before the previous note at tick {previous}")]
    UnorderedInput {
        index: usize,
        start_tick: i64,
        previous: i64,
    },

    /// A note has not been through every placement step.
    #[error("note {index} has not been placed")]
    UnassignedNote { index: usize },

    /// Document (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A note handle does not belong to the context.
    #[error("unknown note handle {index}")]
    UnknownNote { index: usize },

    /// A timer handle points outside its pool.
    #[error("unknown timer handle {timer:?}")]
    UnknownTimer { timer: TimerRef },
}

impl CompileError {
    /// Creates an invalid note error for the note at `index`.
    pub fn invalid_note(index: usize, err: NoteFieldError) -> Self {
        Self::InvalidNote {
            index,
            field: err.field,
            value: err.value,
        }
    }
}

impl BackendError for CompileError {
    fn code(&self) -> &'static str {
        match self {
            CompileError::InvalidNote { .. } => "CIRCUIT_001",
            CompileError::UnorderedInput { .. } => "CIRCUIT_002",
            CompileError::UnassignedNote { .. } => "CIRCUIT_003",
            CompileError::Serialize(_) => "CIRCUIT_004",
            CompileError::UnknownNote { .. } => "CIRCUIT_005",
            CompileError::UnknownTimer { .. } => "CIRCUIT_006",
        }
    }

    fn category(&self) -> &'static str {
        "circuit"
    }
}

/// Output of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// The circuit graph.
    pub document: Document,
    /// Compact JSON of `document`, as written to disk.
    pub json: String,
    /// BLAKE3 hash of `json`.
    pub hash: String,
    /// Component counts.
    pub stats: CircuitStats,
}

/// Compiles notes with a fresh context.
pub fn compile(notes: &[Note]) -> Result<CompileResult, CompileError> {
    let mut ctx = CompileContext::new();
    compile_with(&mut ctx, notes)
}

/// Compiles notes reusing a caller-owned context.
///
/// The context is reset first. On success it holds the pools of this run,
/// which callers may inspect.
pub fn compile_with(
    ctx: &mut CompileContext,
    notes: &[Note],
) -> Result<CompileResult, CompileError> {
    place(ctx, notes)?;

    let document = build_document(ctx)?;
    let json = document.to_json()?;
    let hash = blake3_hash_str(&json);

    Ok(CompileResult {
        document,
        json,
        hash,
        stats: ctx.stats(),
    })
}

/// Lower bound on the node count of compiling `notes`, without placing them.
///
/// Counts what every placement needs: three nodes per note, one emitter with
/// its OR gate, one start timer, the trigger, and the extension chain of the
/// largest start or duration. The chain grows by one node per minute, so this
/// lets callers reject an oversized input before building it.
pub fn minimum_node_count(notes: &[Note]) -> usize {
    if notes.is_empty() {
        return 1;
    }
    let chain = notes
        .iter()
        .flat_map(|n| [n.start_tick, n.duration_tick])
        .map(|ticks| extension_chain_len(u64::try_from(ticks).unwrap_or(0)))
        .max()
        .unwrap_or(0);
    3 * notes.len() + 2 + 1 + 1 + chain
}

/// Builds the document without serializing it.
pub fn build(notes: &[Note]) -> Result<Document, CompileError> {
    let mut ctx = CompileContext::new();
    place(&mut ctx, notes)?;
    build_document(&ctx)
}

/// Resets the context and runs allocation and timer synthesis for every note.
///
/// The whole input is checked before anything is placed, so invalid or
/// unordered input leaves the context empty.
fn place(ctx: &mut CompileContext, notes: &[Note]) -> Result<(), CompileError> {
    ctx.reset();
    check_notes(notes)?;

    for note in notes {
        let id = ctx.register_note(*note)?;
        ctx.assign_emitter(id)?;
        ctx.synthesize_start(id)?;
        ctx.synthesize_duration(id)?;
    }
    Ok(())
}

fn check_notes(notes: &[Note]) -> Result<(), CompileError> {
    let mut previous: Option<i64> = None;
    for (index, note) in notes.iter().enumerate() {
        note.check().map_err(|e| CompileError::invalid_note(index, e))?;
        if let Some(previous) = previous.filter(|p| note.start_tick < *p) {
            return Err(CompileError::UnorderedInput {
                index,
                start_tick: note.start_tick,
                previous,
            });
        }
        previous = Some(note.start_tick);
    }
    Ok(())
}
