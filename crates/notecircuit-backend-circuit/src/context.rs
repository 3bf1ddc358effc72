//! Run-scoped compilation state.
//!
//! A [`CompileContext`] owns every pool the compiler grows during one run: the
//! registered notes, the emitter pool, and the three timer pools. Entities refer
//! to each other through index handles, so the pools can be cleared between
//! runs without dangling references.

use notecircuit_spec::{CircuitStats, Note};

use crate::allocator::Emitter;
use crate::compile::CompileError;
use crate::timer::{Timer, TimerRef};

/// Handle of a note registered in a [`CompileContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub(crate) usize);

impl NoteId {
    /// Position of the note in registration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Handle of an emitter in a [`CompileContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(pub(crate) usize);

impl EmitterId {
    /// Position of the emitter in creation order (its internal id).
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A registered note plus the references derived for it during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedNote {
    pub note: Note,
    pub(crate) emitter: Option<EmitterId>,
    pub(crate) start_timer: Option<TimerRef>,
    pub(crate) duration_timer: Option<TimerRef>,
}

impl PlacedNote {
    fn new(note: Note) -> Self {
        Self {
            note,
            emitter: None,
            start_timer: None,
            duration_timer: None,
        }
    }

    pub fn emitter(&self) -> Option<EmitterId> {
        self.emitter
    }

    pub fn start_timer(&self) -> Option<TimerRef> {
        self.start_timer
    }

    pub fn duration_timer(&self) -> Option<TimerRef> {
        self.duration_timer
    }

    /// Start tick as an unsigned value. Registration rejects negative ticks.
    pub(crate) fn start(&self) -> u64 {
        self.note.start_tick.unsigned_abs()
    }

    /// Duration as an unsigned value. Registration rejects non-positive durations.
    pub(crate) fn duration(&self) -> u64 {
        self.note.duration_tick.unsigned_abs()
    }
}

/// Caller-owned pools for one compilation run.
///
/// Not shareable between concurrent compilations; call [`CompileContext::reset`]
/// (or use [`crate::compile_with`], which does) before reusing it.
#[derive(Debug, Clone, Default)]
pub struct CompileContext {
    pub(crate) notes: Vec<PlacedNote>,
    pub(crate) emitters: Vec<Emitter>,
    pub(crate) duration_timers: Vec<Timer>,
    pub(crate) start_timers: Vec<Timer>,
    pub(crate) extension_timers: Vec<Timer>,
}

impl CompileContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every pool, keeping allocated capacity.
    pub fn reset(&mut self) {
        self.notes.clear();
        self.emitters.clear();
        self.duration_timers.clear();
        self.start_timers.clear();
        self.extension_timers.clear();
    }

    /// Registers a note for placement, rejecting invalid fields.
    pub fn register_note(&mut self, note: Note) -> Result<NoteId, CompileError> {
        let index = self.notes.len();
        note.check().map_err(|e| CompileError::invalid_note(index, e))?;
        self.notes.push(PlacedNote::new(note));
        Ok(NoteId(index))
    }

    /// Registered notes in registration order.
    pub fn notes(&self) -> &[PlacedNote] {
        &self.notes
    }

    /// Emitters in creation order.
    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    /// Duration timers in creation order.
    pub fn duration_timers(&self) -> &[Timer] {
        &self.duration_timers
    }

    /// Start timers in creation order.
    pub fn start_timers(&self) -> &[Timer] {
        &self.start_timers
    }

    /// Extension timers in chain order.
    pub fn extension_timers(&self) -> &[Timer] {
        &self.extension_timers
    }

    /// Looks up a registered note.
    pub fn note(&self, id: NoteId) -> Option<&PlacedNote> {
        self.notes.get(id.0)
    }

    /// Looks up an emitter.
    pub fn emitter(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.get(id.0)
    }

    /// Looks up a timer in whichever pool the handle points into.
    pub fn timer(&self, timer: TimerRef) -> Option<&Timer> {
        match timer {
            TimerRef::Duration(i) => self.duration_timers.get(i),
            TimerRef::Start(i) => self.start_timers.get(i),
            TimerRef::Extension(i) => self.extension_timers.get(i),
        }
    }

    pub(crate) fn timer_mut(&mut self, timer: TimerRef) -> Option<&mut Timer> {
        match timer {
            TimerRef::Duration(i) => self.duration_timers.get_mut(i),
            TimerRef::Start(i) => self.start_timers.get_mut(i),
            TimerRef::Extension(i) => self.extension_timers.get_mut(i),
        }
    }

    pub(crate) fn placed(&self, id: NoteId) -> Result<&PlacedNote, CompileError> {
        self.notes
            .get(id.0)
            .ok_or(CompileError::UnknownNote { index: id.0 })
    }

    /// Component counts for the circuit the current pools describe.
    pub fn stats(&self) -> CircuitStats {
        let emitters = self.emitters.len();
        let duration_timers = self.duration_timers.len();
        let start_timers = self.start_timers.len();
        let extension_timers = self.extension_timers.len();
        // One OR gate per emitter, one NOR and one AND per duration timer.
        let logic_gates = emitters + 2 * duration_timers;

        CircuitStats {
            notes: self.notes.len(),
            emitters,
            duration_timers,
            start_timers,
            extension_timers,
            logic_gates,
            nodes: emitters + logic_gates + duration_timers + start_timers + extension_timers + 1,
        }
    }
}
