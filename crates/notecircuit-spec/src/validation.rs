//! Note sequence validation.
//!
//! Unlike the compiler, which stops at the first bad note, validation walks the
//! whole sequence and collects every diagnostic so a report can list them all.

use std::collections::HashSet;

use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::note::{Note, NoteField, NoteSequence, PITCH_CLASS_MAX, PITCH_CLASS_MIN};

/// Validates a note sequence and returns a validation result.
///
/// # Example
/// ```
/// use notecircuit_spec::{Note, NoteSequence};
/// use notecircuit_spec::validation::validate_sequence;
///
/// let seq = NoteSequence::new(vec![Note::new(0, 20, 12), Note::new(40, 20, 12)]);
/// assert!(validate_sequence(&seq).is_ok());
/// ```
pub fn validate_sequence(sequence: &NoteSequence) -> ValidationResult {
    validate_notes(&sequence.notes)
}

/// Validates a slice of notes.
pub fn validate_notes(notes: &[Note]) -> ValidationResult {
    let mut result = ValidationResult::default();

    if notes.is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptySequence,
            "sequence has no notes; the circuit will only contain a trigger",
            "notes",
        ));
        return result;
    }

    for (index, note) in notes.iter().enumerate() {
        validate_fields(index, note, &mut result);
    }
    validate_order(notes, &mut result);
    check_warnings(notes, &mut result);

    result
}

/// Parses and validates a JSON note sequence in one step.
///
/// Parse failures are reported as `E005` rather than returned as errors.
pub fn validate_json(json: &str) -> (Option<NoteSequence>, ValidationResult) {
    match NoteSequence::from_json(json) {
        Ok(sequence) => {
            let result = validate_sequence(&sequence);
            (Some(sequence), result)
        }
        Err(e) => {
            let result = ValidationResult::failure(ValidationError::new(
                ErrorCode::MalformedInput,
                e.to_string(),
            ));
            (None, result)
        }
    }
}

/// Maps an invalid field to its error code.
pub fn error_code_for(field: NoteField) -> ErrorCode {
    match field {
        NoteField::StartTick => ErrorCode::InvalidStartTick,
        NoteField::DurationTick => ErrorCode::InvalidDurationTick,
        NoteField::PitchClass => ErrorCode::PitchClassOutOfRange,
    }
}

/// JSON path of a note field.
pub fn field_path(index: usize, field: NoteField) -> String {
    format!("notes[{}].{}", index, field.as_str())
}

fn validate_fields(index: usize, note: &Note, result: &mut ValidationResult) {
    // Every field is checked, not only the first bad one.
    let fields = [
        (NoteField::StartTick, note.start_tick < 0, note.start_tick),
        (
            NoteField::DurationTick,
            note.duration_tick <= 0,
            note.duration_tick,
        ),
        (
            NoteField::PitchClass,
            !(PITCH_CLASS_MIN..=PITCH_CLASS_MAX).contains(&note.pitch_class),
            i64::from(note.pitch_class),
        ),
    ];

    for (field, invalid, value) in fields {
        if invalid {
            result.add_error(ValidationError::with_path(
                error_code_for(field),
                format!("{} {}, got {}", field, field.requirement(), value),
                field_path(index, field),
            ));
        }
    }
}

fn validate_order(notes: &[Note], result: &mut ValidationResult) {
    for (index, pair) in notes.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        if current.start_tick < previous.start_tick {
            result.add_error(ValidationError::with_path(
                ErrorCode::UnorderedNotes,
                format!(
                    "start_tick {} precedes previous note's start_tick {}",
                    current.start_tick, previous.start_tick
                ),
                field_path(index + 1, NoteField::StartTick),
            ));
        }
    }
}

fn check_warnings(notes: &[Note], result: &mut ValidationResult) {
    let mut seen: HashSet<&Note> = HashSet::new();
    for (index, note) in notes.iter().enumerate() {
        if !seen.insert(note) {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::DuplicateNote,
                "duplicate note will be voiced by a separate emitter",
                format!("notes[{}]", index),
            ));
        }
        if note.check().is_ok() && note.needs_extension() {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::ExtensionRequired,
                format!(
                    "note spans more than 60 seconds (start {} ticks, duration {} ticks); extension timers will be chained",
                    note.start_tick, note.duration_tick
                ),
                format!("notes[{}]", index),
            ));
        }
    }
}
