//! Property tests for the allocator and timer synthesizer.

use notecircuit_backend_circuit::{compile, compile_with, CompileContext, TimerRef};
use notecircuit_spec::{EmitterKind, Note};
use proptest::prelude::*;

/// Sorted note lists over a small pitch range so emitters get reused.
fn note_list() -> impl Strategy<Value = Vec<Note>> {
    prop::collection::vec(
        (0i64..12_000, 1i64..4_000, 0i32..4, 0usize..2),
        0..40,
    )
    .prop_map(|raw| {
        let mut notes: Vec<Note> = raw
            .into_iter()
            .map(|(start, duration, pitch, kind)| {
                Note::new(start, duration, pitch).with_kind(EmitterKind::ALL[kind])
            })
            .collect();
        notes.sort_by_key(|n| n.start_tick);
        notes
    })
}

fn compiled(notes: &[Note]) -> CompileContext {
    let mut ctx = CompileContext::new();
    compile_with(&mut ctx, notes).unwrap();
    ctx
}

proptest! {
    /// Notes sharing an emitter are separated by more than the release gap.
    #[test]
    fn emitter_notes_never_overlap(notes in note_list()) {
        let ctx = compiled(&notes);
        for emitter in ctx.emitters() {
            let assigned: Vec<&Note> = emitter
                .notes()
                .iter()
                .map(|id| &ctx.note(*id).unwrap().note)
                .collect();
            for (i, a) in assigned.iter().enumerate() {
                prop_assert!(emitter.matches(a));
                for b in &assigned[i + 1..] {
                    prop_assert!(
                        a.end_tick() + 1 <= b.start_tick || b.end_tick() + 1 <= a.start_tick,
                        "overlap: {:?} and {:?}", a, b
                    );
                }
            }
        }
    }

    /// Every note's timers reconstruct its start and duration exactly.
    #[test]
    fn timers_round_trip_through_extensions(notes in note_list()) {
        let ctx = compiled(&notes);
        for placed in ctx.notes() {
            let start = placed.start_timer().unwrap();
            let duration = placed.duration_timer().unwrap();
            prop_assert_eq!(ctx.total_ticks(start), Some(placed.note.start_tick as u64));
            prop_assert_eq!(ctx.total_ticks(duration), Some(placed.note.duration_tick as u64));
        }
    }

    /// No timer component holds more than 60 seconds.
    #[test]
    fn timer_components_fit(notes in note_list()) {
        let ctx = compiled(&notes);
        let all = ctx
            .duration_timers()
            .iter()
            .chain(ctx.start_timers())
            .chain(ctx.extension_timers());
        for timer in all {
            prop_assert!(timer.own_ticks() <= 2400, "{:?}", timer);
        }
    }

    /// A shared start timer serves notes of one emitter with equal start and duration.
    #[test]
    fn shared_start_timers_agree(notes in note_list()) {
        let ctx = compiled(&notes);
        for (index, timer) in ctx.start_timers().iter().enumerate() {
            let attached: Vec<&Note> = timer
                .notes()
                .iter()
                .map(|id| &ctx.note(*id).unwrap().note)
                .collect();
            for note in &attached {
                prop_assert_eq!(note.start_tick, attached[0].start_tick);
                prop_assert_eq!(note.duration_tick, attached[0].duration_tick);
            }
            for id in timer.notes() {
                let placed = ctx.note(*id).unwrap();
                prop_assert_eq!(placed.start_timer(), Some(TimerRef::Start(index)));
                prop_assert_eq!(placed.emitter(), timer.emitter);
            }
        }
    }

    /// Compiling twice yields byte-identical output.
    #[test]
    fn compilation_is_deterministic(notes in note_list()) {
        let first = compile(&notes).unwrap();
        let second = compile(&notes).unwrap();
        prop_assert_eq!(&first.json, &second.json);
        prop_assert_eq!(&first.hash, &second.hash);
    }

    /// Node ids run from zero in emission order and every link resolves.
    #[test]
    fn node_ids_are_dense_and_links_resolve(notes in note_list()) {
        let result = compile(&notes).unwrap();
        let count = result.document.node_count();
        prop_assert_eq!(count, result.stats.nodes);
        for (position, node) in result.document.nodes().enumerate() {
            prop_assert_eq!(node.id().0 as usize, position);
            for link in node.links() {
                prop_assert!((link.0 as usize) < count);
            }
        }
    }
}
