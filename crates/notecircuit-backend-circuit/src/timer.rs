//! Timer synthesis.
//!
//! Every note needs a start timer (delay from the trigger until the note
//! sounds) and a duration timer (how long it sounds). A timer component holds
//! at most 60 seconds, so larger values are split: the timer keeps the
//! remainder and is linked from a shared chain of 60-second extension timers
//! that fire one after another from the trigger.
//!
//! ```text
//! trigger -> ext[0] -> ext[1] -> ... -> ext[k] -> timer (seconds % 60, ticks)
//! ```

use notecircuit_spec::{MAX_TIMER_SECONDS, TICKS_PER_SECOND};

use crate::compile::CompileError;
use crate::context::{CompileContext, EmitterId, NoteId};

const TICKS_PER_SECOND_U64: u64 = TICKS_PER_SECOND as u64;
const MAX_TIMER_SECONDS_U64: u64 = MAX_TIMER_SECONDS as u64;
const EXTENSION_TICKS: u64 = MAX_TIMER_SECONDS_U64 * TICKS_PER_SECOND_U64;

/// What a timer is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerRole {
    /// How long a note sounds.
    Duration,
    /// How long to wait before a note sounds.
    Start,
    /// A chained 60-second unit.
    Extension,
}

/// Handle of a timer in one of the three pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerRef {
    Duration(usize),
    Start(usize),
    Extension(usize),
}

/// Splits a tick count into `(seconds, ticks)`.
///
/// Values of 40 ticks or less stay entirely in the ticks field, so exactly one
/// second is written as `(0, 40)`.
pub fn decompose(value: u64) -> (u64, u64) {
    if value > TICKS_PER_SECOND_U64 {
        (value / TICKS_PER_SECOND_U64, value % TICKS_PER_SECOND_U64)
    } else {
        (0, value)
    }
}

/// Returns true if `(seconds, ticks)` does not fit in one timer component.
pub fn needs_extension(seconds: u64, ticks: u64) -> bool {
    seconds > MAX_TIMER_SECONDS_U64 || (seconds == MAX_TIMER_SECONDS_U64 && ticks > 0)
}

/// Number of chained extension timers a tick value hangs from.
pub fn extension_chain_len(value: u64) -> usize {
    let (seconds, ticks) = decompose(value);
    if needs_extension(seconds, ticks) {
        (seconds / MAX_TIMER_SECONDS_U64) as usize
    } else {
        0
    }
}

/// A delay or duration component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    pub role: TimerRole,
    /// Seconds held by this component (at most 60 once chained).
    pub seconds: u64,
    /// Ticks held by this component.
    pub ticks: u64,
    /// The tick count the timer stands for, including upstream extensions.
    pub value: u64,
    /// Emitter whose notes use this timer (none for extensions).
    pub emitter: Option<EmitterId>,
    /// Extension timer that links to this one, if chained.
    pub extended_by: Option<usize>,
    pub(crate) notes: Vec<NoteId>,
    pub(crate) linked: Vec<TimerRef>,
}

impl Timer {
    fn new(role: TimerRole, value: u64, emitter: Option<EmitterId>) -> Self {
        let (seconds, ticks) = decompose(value);
        Self {
            role,
            seconds,
            ticks,
            value,
            emitter,
            extended_by: None,
            notes: Vec::new(),
            linked: Vec::new(),
        }
    }

    fn extension(index: usize) -> Self {
        let value = EXTENSION_TICKS * (index as u64 + 1);
        let mut timer = Self::new(TimerRole::Extension, value, None);
        timer.seconds = MAX_TIMER_SECONDS_U64;
        timer.ticks = 0;
        timer
    }

    /// Ticks represented by this component alone.
    pub fn own_ticks(&self) -> u64 {
        self.seconds * TICKS_PER_SECOND_U64 + self.ticks
    }

    /// Notes attached to this timer (duration and start timers).
    pub fn notes(&self) -> &[NoteId] {
        &self.notes
    }

    /// Timers this extension timer starts when it fires.
    pub fn linked(&self) -> &[TimerRef] {
        &self.linked
    }

    /// Returns true if the timer is started by an extension rather than directly.
    pub fn is_extended(&self) -> bool {
        self.extended_by.is_some()
    }
}

impl CompileContext {
    /// Creates the duration timer for a note. Duration timers are never shared.
    pub fn synthesize_duration(&mut self, note: NoteId) -> Result<TimerRef, CompileError> {
        let placed = self.placed(note)?;
        if let Some(existing) = placed.duration_timer {
            return Ok(existing);
        }
        let emitter = placed
            .emitter
            .ok_or(CompileError::UnassignedNote { index: note.0 })?;

        let mut timer = Timer::new(TimerRole::Duration, placed.duration(), Some(emitter));
        timer.notes.push(note);

        let handle = TimerRef::Duration(self.duration_timers.len());
        self.duration_timers.push(timer);
        self.notes[note.0].duration_timer = Some(handle);
        self.synthesize_extension(handle)?;
        Ok(handle)
    }

    /// Finds or creates the start timer for a note.
    ///
    /// A start timer is reused when it belongs to the same emitter, stands for
    /// the same start tick, and every note already on it has the same duration.
    pub fn synthesize_start(&mut self, note: NoteId) -> Result<TimerRef, CompileError> {
        let placed = self.placed(note)?;
        if let Some(existing) = placed.start_timer {
            return Ok(existing);
        }
        let emitter = placed
            .emitter
            .ok_or(CompileError::UnassignedNote { index: note.0 })?;
        let start = placed.start();
        let duration = placed.duration();

        let notes = &self.notes;
        let reusable = self.start_timers.iter().position(|timer| {
            timer.emitter == Some(emitter)
                && timer.value == start
                && timer
                    .notes
                    .iter()
                    .all(|attached| notes[attached.0].duration() == duration)
        });

        let handle = match reusable {
            Some(index) => TimerRef::Start(index),
            None => {
                let handle = TimerRef::Start(self.start_timers.len());
                self.start_timers
                    .push(Timer::new(TimerRole::Start, start, Some(emitter)));
                self.synthesize_extension(handle)?;
                handle
            }
        };

        if let TimerRef::Start(index) = handle {
            self.start_timers[index].notes.push(note);
        }
        self.notes[note.0].start_timer = Some(handle);
        Ok(handle)
    }

    /// Chains a timer to the extension whose expiry leaves the timer's remainder.
    ///
    /// Missing extensions are created in order, each linked from its
    /// predecessor. Returns the index of the extension the timer hangs from,
    /// or `None` if the timer already fits in one component.
    pub fn synthesize_extension(&mut self, timer: TimerRef) -> Result<Option<usize>, CompileError> {
        let (seconds, ticks) = {
            let t = self
                .timer(timer)
                .ok_or(CompileError::UnknownTimer { timer })?;
            if t.is_extended() {
                return Ok(t.extended_by);
            }
            (t.seconds, t.ticks)
        };
        if !needs_extension(seconds, ticks) {
            return Ok(None);
        }

        let index = (seconds / MAX_TIMER_SECONDS_U64 - 1) as usize;
        while self.extension_timers.len() <= index {
            let next = self.extension_timers.len();
            let mut extension = Timer::extension(next);
            if let Some(previous) = next.checked_sub(1) {
                self.extension_timers[previous]
                    .linked
                    .push(TimerRef::Extension(next));
                extension.extended_by = Some(previous);
            }
            self.extension_timers.push(extension);
        }
        self.extension_timers[index].linked.push(timer);

        if let Some(t) = self.timer_mut(timer) {
            t.seconds %= MAX_TIMER_SECONDS_U64;
            t.extended_by = Some(index);
        }
        Ok(Some(index))
    }

    /// Reconstructs the tick count a timer stands for by walking its extension chain.
    pub fn total_ticks(&self, timer: TimerRef) -> Option<u64> {
        let mut current = self.timer(timer)?;
        let mut total = current.own_ticks();
        while let Some(parent) = current.extended_by {
            current = self.extension_timers.get(parent)?;
            total += current.own_ticks();
        }
        Some(total)
    }
}
