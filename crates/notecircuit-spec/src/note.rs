//! Note event types consumed by the circuit compiler.
//!
//! A [`NoteSequence`] is the on-disk input envelope: a time-ordered list of
//! [`Note`] records, each naming the emitter family and sub-flavor that should
//! sound it. Tick values are kept signed so that malformed input survives
//! deserialization and can be reported with its index and field.

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Ticks executed by the target runtime per second.
pub const TICKS_PER_SECOND: i64 = 40;

/// Largest value (in seconds) a single timer component can hold.
pub const MAX_TIMER_SECONDS: i64 = 60;

/// Lowest supported pitch class.
pub const PITCH_CLASS_MIN: i32 = 0;

/// Highest supported pitch class (inclusive). Emitters span two octaves plus one.
pub const PITCH_CLASS_MAX: i32 = 24;

/// Gap (in ticks) that still counts as touching when placing notes on an emitter.
pub const OVERLAP_TOLERANCE_TICKS: i64 = 1;

/// Instrument family of an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterKind {
    Default,
    Bass,
    Synth,
    Percussion,
}

impl EmitterKind {
    /// All kinds, in declaration order.
    pub const ALL: [EmitterKind; 4] = [
        EmitterKind::Default,
        EmitterKind::Bass,
        EmitterKind::Synth,
        EmitterKind::Percussion,
    ];

    /// Returns the string representation used in input files and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmitterKind::Default => "default",
            EmitterKind::Bass => "bass",
            EmitterKind::Synth => "synth",
            EmitterKind::Percussion => "percussion",
        }
    }
}

impl std::fmt::Display for EmitterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sound sub-flavor of an emitter family.
///
/// The discriminant is written verbatim as the emitter's audio index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EmitterVariant {
    #[default]
    Dance = 0,
    Retro = 1,
}

impl EmitterVariant {
    /// Audio index understood by the target runtime.
    pub fn audio_index(&self) -> u32 {
        *self as u32
    }

    /// Returns the string representation used in input files and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmitterVariant::Dance => "dance",
            EmitterVariant::Retro => "retro",
        }
    }
}

impl std::fmt::Display for EmitterVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single musical event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Note {
    /// Absolute start time in ticks.
    pub start_tick: i64,
    /// Sounding length in ticks (must be positive).
    pub duration_tick: i64,
    /// Pitch class in `PITCH_CLASS_MIN..=PITCH_CLASS_MAX`.
    pub pitch_class: i32,
    /// Instrument family.
    #[serde(default = "default_kind")]
    pub emitter_kind: EmitterKind,
    /// Instrument sub-flavor.
    #[serde(default)]
    pub emitter_variant: EmitterVariant,
}

fn default_kind() -> EmitterKind {
    EmitterKind::Default
}

impl Note {
    /// Creates a note on the default emitter family and variant.
    pub fn new(start_tick: i64, duration_tick: i64, pitch_class: i32) -> Self {
        Self {
            start_tick,
            duration_tick,
            pitch_class,
            emitter_kind: EmitterKind::Default,
            emitter_variant: EmitterVariant::Dance,
        }
    }

    /// Sets the emitter family.
    pub fn with_kind(mut self, kind: EmitterKind) -> Self {
        self.emitter_kind = kind;
        self
    }

    /// Sets the emitter variant.
    pub fn with_variant(mut self, variant: EmitterVariant) -> Self {
        self.emitter_variant = variant;
        self
    }

    /// Exclusive end of the note's interval.
    pub fn end_tick(&self) -> i64 {
        self.start_tick + self.duration_tick
    }

    /// Returns true if the two notes are too close to share one emitter.
    ///
    /// Intervals separated by `OVERLAP_TOLERANCE_TICKS` or less count as overlapping.
    pub fn overlaps(&self, other: &Note) -> bool {
        let clear_before = self.end_tick() + OVERLAP_TOLERANCE_TICKS < other.start_tick;
        let clear_after = other.end_tick() + OVERLAP_TOLERANCE_TICKS < self.start_tick;
        !(clear_before || clear_after)
    }

    /// Checks the note's fields, returning the first offending one.
    pub fn check(&self) -> Result<(), NoteFieldError> {
        if self.start_tick < 0 {
            return Err(NoteFieldError::new(NoteField::StartTick, self.start_tick));
        }
        if self.duration_tick <= 0 {
            return Err(NoteFieldError::new(
                NoteField::DurationTick,
                self.duration_tick,
            ));
        }
        if !(PITCH_CLASS_MIN..=PITCH_CLASS_MAX).contains(&self.pitch_class) {
            return Err(NoteFieldError::new(
                NoteField::PitchClass,
                i64::from(self.pitch_class),
            ));
        }
        Ok(())
    }

    /// Returns true if placing this note requires extension timers.
    pub fn needs_extension(&self) -> bool {
        exceeds_single_timer(self.start_tick) || exceeds_single_timer(self.duration_tick)
    }
}

/// Returns true if `ticks` cannot be held by one timer component.
pub fn exceeds_single_timer(ticks: i64) -> bool {
    ticks > MAX_TIMER_SECONDS * TICKS_PER_SECOND
}

/// A note field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteField {
    StartTick,
    DurationTick,
    PitchClass,
}

impl NoteField {
    /// Field name as it appears in input files.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteField::StartTick => "start_tick",
            NoteField::DurationTick => "duration_tick",
            NoteField::PitchClass => "pitch_class",
        }
    }

    /// Human-readable constraint the field must satisfy.
    pub fn requirement(&self) -> String {
        match self {
            NoteField::StartTick => "must be non-negative".to_string(),
            NoteField::DurationTick => "must be positive".to_string(),
            NoteField::PitchClass => {
                format!("must be in {}..={}", PITCH_CLASS_MIN, PITCH_CLASS_MAX)
            }
        }
    }
}

impl std::fmt::Display for NoteField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The offending field and value of an invalid note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteFieldError {
    pub field: NoteField,
    pub value: i64,
}

impl NoteFieldError {
    pub fn new(field: NoteField, value: i64) -> Self {
        Self { field, value }
    }
}

impl std::fmt::Display for NoteFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}, got {}",
            self.field,
            self.field.requirement(),
            self.value
        )
    }
}

impl std::error::Error for NoteFieldError {}

/// Input envelope: `{"notes": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoteSequence {
    pub notes: Vec<Note>,
}

impl NoteSequence {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// Parses a sequence from JSON.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the sequence to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Returns true if start ticks are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.notes
            .windows(2)
            .all(|pair| pair[0].start_tick <= pair[1].start_tick)
    }

    /// Stable sort by start tick; notes sharing a start keep their relative order.
    pub fn sort_by_start(&mut self) {
        self.notes.sort_by_key(|n| n.start_tick);
    }
}
