//! Emitter allocation.
//!
//! Each note is voiced by an emitter of its `(kind, variant, pitch_class)`
//! class. An emitter can be reused for any number of notes as long as none of
//! them overlap (within the one-tick tolerance). Allocation is first-fit over
//! the emitters created so far, which is O(pool size) per note; the pool only
//! grows and is never capped here.

use notecircuit_spec::{EmitterKind, EmitterVariant, Note};

use crate::compile::CompileError;
use crate::context::{CompileContext, EmitterId, NoteId, PlacedNote};

/// One instrument placed in the output circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitter {
    pub kind: EmitterKind,
    pub variant: EmitterVariant,
    pub pitch_class: i32,
    /// Creation-order sequence number.
    pub internal_id: usize,
    pub(crate) notes: Vec<NoteId>,
}

impl Emitter {
    fn for_note(note: &Note, internal_id: usize) -> Self {
        Self {
            kind: note.emitter_kind,
            variant: note.emitter_variant,
            pitch_class: note.pitch_class,
            internal_id,
            notes: Vec::new(),
        }
    }

    /// Notes assigned to this emitter, in assignment order.
    pub fn notes(&self) -> &[NoteId] {
        &self.notes
    }

    /// Returns true if this emitter voices the note's class.
    pub fn matches(&self, note: &Note) -> bool {
        self.kind == note.emitter_kind
            && self.variant == note.emitter_variant
            && self.pitch_class == note.pitch_class
    }

    /// Returns true if the note can be added without overlapping an assigned note.
    pub(crate) fn accepts(&self, note: &Note, placed: &[PlacedNote]) -> bool {
        self.matches(note)
            && self
                .notes
                .iter()
                .all(|id| !placed[id.0].note.overlaps(note))
    }
}

impl CompileContext {
    /// Assigns the note to the first compatible emitter, creating one if needed.
    ///
    /// Notes must be assigned in non-decreasing start order; the scan only
    /// consults emitters that already exist. Assigning an already placed note
    /// returns its current emitter.
    pub fn assign_emitter(&mut self, note: NoteId) -> Result<EmitterId, CompileError> {
        let placed = self.placed(note)?;
        if let Some(existing) = placed.emitter {
            return Ok(existing);
        }
        let candidate = placed.note;

        let found = self
            .emitters
            .iter()
            .position(|emitter| emitter.accepts(&candidate, &self.notes));

        let index = match found {
            Some(index) => index,
            None => {
                let index = self.emitters.len();
                self.emitters.push(Emitter::for_note(&candidate, index));
                index
            }
        };

        self.emitters[index].notes.push(note);
        let emitter = EmitterId(index);
        self.notes[note.0].emitter = Some(emitter);
        Ok(emitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign_all(ctx: &mut CompileContext, notes: &[Note]) -> Vec<EmitterId> {
        notes
            .iter()
            .map(|n| {
                let id = ctx.register_note(*n).unwrap();
                ctx.assign_emitter(id).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_touching_notes_need_separate_emitters() {
        let mut ctx = CompileContext::new();
        let ids = assign_all(&mut ctx, &[Note::new(0, 20, 12), Note::new(21, 19, 12)]);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(ctx.emitters().len(), 2);
    }

    #[test]
    fn test_separated_notes_share_emitter() {
        let mut ctx = CompileContext::new();
        let ids = assign_all(&mut ctx, &[Note::new(0, 20, 12), Note::new(25, 15, 12)]);
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ctx.emitters().len(), 1);
        assert_eq!(ctx.emitters()[0].notes().len(), 2);
    }

    #[test]
    fn test_different_class_never_shares() {
        let mut ctx = CompileContext::new();
        let ids = assign_all(
            &mut ctx,
            &[
                Note::new(0, 10, 12),
                Note::new(100, 10, 13),
                Note::new(200, 10, 12).with_kind(EmitterKind::Synth),
                Note::new(300, 10, 12).with_variant(EmitterVariant::Retro),
            ],
        );
        assert_eq!(ctx.emitters().len(), 4);
        assert_eq!(ids[3].index(), 3);
        assert_eq!(ctx.emitters()[2].kind, EmitterKind::Synth);
        assert_eq!(ctx.emitters()[3].variant, EmitterVariant::Retro);
    }

    #[test]
    fn test_matches_compares_kind_variant_and_pitch() {
        let mut ctx = CompileContext::new();
        assign_all(&mut ctx, &[Note::new(0, 10, 12)]);
        let emitter = &ctx.emitters()[0];

        assert!(emitter.matches(&Note::new(500, 40, 12)));
        assert!(!emitter.matches(&Note::new(0, 10, 11)));
        assert!(!emitter.matches(&Note::new(0, 10, 12).with_kind(EmitterKind::Bass)));
        assert!(!emitter.matches(&Note::new(0, 10, 12).with_variant(EmitterVariant::Retro)));
    }

    #[test]
    fn test_first_fit_prefers_oldest_emitter() {
        let mut ctx = CompileContext::new();
        let ids = assign_all(
            &mut ctx,
            &[
                Note::new(0, 50, 5),
                Note::new(10, 10, 5),
                // Both existing emitters are free again; the first one wins.
                Note::new(100, 10, 5),
            ],
        );
        assert_eq!(ids[0].index(), 0);
        assert_eq!(ids[1].index(), 1);
        assert_eq!(ids[2].index(), 0);
    }

    #[test]
    fn test_assign_is_idempotent() {
        let mut ctx = CompileContext::new();
        let id = ctx.register_note(Note::new(0, 10, 1)).unwrap();
        let first = ctx.assign_emitter(id).unwrap();
        let second = ctx.assign_emitter(id).unwrap();
        assert_eq!(first, second);
        assert_eq!(ctx.emitters()[0].notes().len(), 1);
    }

    #[test]
    fn test_internal_ids_follow_creation_order() {
        let mut ctx = CompileContext::new();
        assign_all(
            &mut ctx,
            &[Note::new(0, 10, 1), Note::new(0, 10, 2), Note::new(0, 10, 3)],
        );
        let internal: Vec<usize> = ctx.emitters().iter().map(|e| e.internal_id).collect();
        assert_eq!(internal, vec![0, 1, 2]);
    }
}
