//! Integration tests for complete compilations.
//!
//! These tests compile small note lists end to end and check the emitted
//! document: node order, ids, wiring, and exact JSON for the smallest circuit.

use notecircuit_backend_circuit::graph::{Controller, GateMode, Layout};
use notecircuit_backend_circuit::{
    compile, compile_with, trigger_timers, CompileContext, CompileError, Document, NodeId,
    TimerRef,
};
use notecircuit_spec::{EmitterKind, EmitterVariant, Note};
use pretty_assertions::assert_eq;

// =============================================================================
// Helper Functions
// =============================================================================

fn timer_values(doc: &Document, id: NodeId) -> (u64, u64) {
    match &doc.node(id).expect("node exists").controller {
        Controller::Timer(timer) => (timer.seconds, timer.ticks),
        other => panic!("node {id:?} is not a timer: {other:?}"),
    }
}

fn gate_mode(doc: &Document, id: NodeId) -> GateMode {
    match &doc.node(id).expect("node exists").controller {
        Controller::Gate(gate) => gate.mode,
        other => panic!("node {id:?} is not a gate: {other:?}"),
    }
}

fn ids(values: &[u32]) -> Vec<NodeId> {
    values.iter().map(|v| NodeId(*v)).collect()
}

// =============================================================================
// Scenario A: a single short note
// =============================================================================

#[test]
fn test_single_note_exact_json() {
    let result = compile(&[Note::new(0, 20, 12)]).unwrap();

    let expected = concat!(
        r#"{"bodies":[{"childs":["#,
        r#"{"color":"df7f01","controller":{"active":true,"controllers":[{"id":1}],"id":0,"joints":null,"mode":1},"pos":{"x":0,"y":0,"z":0},"shapeId":"9f0f56e8-2c31-4d83-996c-d00a9b296c3f","xaxis":-2,"zaxis":-1},"#,
        r#"{"color":"7f7f7f","controller":{"audioIndex":0,"controllers":null,"id":1,"joints":null,"pitch":0.5,"volume":50},"pos":{"x":0,"y":0,"z":0},"shapeId":"1c04327f-1de4-4b06-92a8-2c9b40e491aa","xaxis":-2,"zaxis":-1},"#,
        r#"{"color":"df7f01","controller":{"active":false,"controllers":[{"id":3}],"id":2,"joints":null,"seconds":0,"ticks":20},"pos":{"x":0,"y":0,"z":0},"shapeId":"8f7fd0e7-c46e-4944-a414-7ce2437bb30f","xaxis":-2,"zaxis":-1},"#,
        r#"{"color":"df7f01","controller":{"active":true,"controllers":[{"id":4}],"id":3,"joints":null,"mode":4},"pos":{"x":0,"y":0,"z":0},"shapeId":"9f0f56e8-2c31-4d83-996c-d00a9b296c3f","xaxis":-2,"zaxis":-1},"#,
        r#"{"color":"df7f01","controller":{"active":true,"controllers":[{"id":0}],"id":4,"joints":null,"mode":0},"pos":{"x":0,"y":0,"z":0},"shapeId":"9f0f56e8-2c31-4d83-996c-d00a9b296c3f","xaxis":-2,"zaxis":-1},"#,
        r#"{"color":"df7f01","controller":{"active":false,"controllers":[{"id":2},{"id":4}],"id":5,"joints":null,"seconds":0,"ticks":0},"pos":{"x":0,"y":0,"z":0},"shapeId":"8f7fd0e7-c46e-4944-a414-7ce2437bb30f","xaxis":-2,"zaxis":-1},"#,
        r#"{"color":"df7f01","controller":{"active":true,"controllers":[{"id":5}],"id":6,"joints":null},"pos":{"x":0,"y":0,"z":1},"shapeId":"7cf717d7-d167-4f2d-a6e7-6b2c70aa3986","xaxis":3,"zaxis":-1}"#,
        r#"]}],"version":3}"#,
    );
    assert_eq!(result.json, expected);
}

#[test]
fn test_single_note_components() {
    let result = compile(&[Note::new(0, 20, 12)]).unwrap();
    let stats = result.stats;
    assert_eq!(stats.emitters, 1);
    assert_eq!(stats.duration_timers, 1);
    assert_eq!(stats.start_timers, 1);
    assert_eq!(stats.extension_timers, 0);
    assert_eq!(stats.logic_gates, 3);
    assert_eq!(stats.nodes, 7);

    let doc = &result.document;
    assert_eq!(gate_mode(doc, NodeId(0)), GateMode::Or);
    assert_eq!(timer_values(doc, NodeId(2)), (0, 20));
    assert_eq!(gate_mode(doc, NodeId(3)), GateMode::Nor);
    assert_eq!(gate_mode(doc, NodeId(4)), GateMode::And);
    assert_eq!(timer_values(doc, NodeId(5)), (0, 0));
    assert_eq!(doc.trigger().unwrap().links(), ids(&[5]));
}

// =============================================================================
// Scenario B: a duration beyond 60 seconds
// =============================================================================

#[test]
fn test_long_duration_uses_extension() {
    let mut ctx = CompileContext::new();
    let result = compile_with(&mut ctx, &[Note::new(0, 3000, 12)]).unwrap();
    let layout = Layout::assign(&ctx);
    let doc = &result.document;

    assert_eq!(result.stats.extension_timers, 1);
    assert_eq!(timer_values(doc, layout.durations[0].timer), (15, 0));
    assert_eq!(timer_values(doc, layout.extensions[0]), (60, 0));
    assert_eq!(
        doc.node(layout.extensions[0]).unwrap().links(),
        vec![layout.durations[0].timer]
    );

    // The start timer fits, so the trigger fires it and the chain head.
    assert_eq!(
        doc.trigger().unwrap().links(),
        vec![layout.starts[0], layout.extensions[0]]
    );
    assert_eq!(ctx.total_ticks(TimerRef::Duration(0)), Some(3000));
}

#[test]
fn test_long_start_reached_through_chain_only() {
    let mut ctx = CompileContext::new();
    compile_with(&mut ctx, &[Note::new(0, 20, 1), Note::new(6000, 20, 1)]).unwrap();
    assert_eq!(
        trigger_timers(&ctx),
        vec![TimerRef::Start(0), TimerRef::Extension(0)]
    );
    // 150 s hangs from ext[1] with 30 s left.
    let start = ctx.timer(TimerRef::Start(1)).unwrap();
    assert_eq!((start.seconds, start.ticks), (30, 0));
    assert_eq!(start.extended_by, Some(1));
}

// =============================================================================
// Scenarios C and D: emitter reuse at the tolerance boundary
// =============================================================================

#[test]
fn test_one_tick_gap_forces_second_emitter() {
    let result = compile(&[Note::new(0, 20, 12), Note::new(21, 19, 12)]).unwrap();
    assert_eq!(result.stats.emitters, 2);
}

#[test]
fn test_five_tick_gap_shares_emitter() {
    let result = compile(&[Note::new(0, 20, 12), Note::new(25, 15, 12)]).unwrap();
    assert_eq!(result.stats.emitters, 1);
    assert_eq!(result.stats.duration_timers, 2);

    // Both AND gates drive the single OR gate.
    let doc = &result.document;
    assert_eq!(doc.node(NodeId(4)).unwrap().links(), ids(&[0]));
    assert_eq!(doc.node(NodeId(7)).unwrap().links(), ids(&[0]));
}

#[test]
fn test_emitter_kinds_and_variants() {
    let result = compile(&[
        Note::new(0, 20, 0).with_kind(EmitterKind::Percussion),
        Note::new(0, 20, 24)
            .with_kind(EmitterKind::Synth)
            .with_variant(EmitterVariant::Retro),
    ])
    .unwrap();
    let doc = &result.document;

    let first = doc.node(NodeId(1)).unwrap();
    assert_eq!(first.shape_id, "4c6e27a2-4c35-4df3-9794-5e206fef9012");
    assert_eq!(first.color, "000000");

    let second = doc.node(NodeId(3)).unwrap();
    assert_eq!(second.shape_id, "a052e116-f273-4d73-872c-924a97b86720");
    assert_eq!(second.color, "ffffff");
    match &second.controller {
        Controller::Emitter(emitter) => {
            assert_eq!(emitter.audio_index, 1);
            assert_eq!(emitter.pitch, 1.0);
        }
        other => panic!("expected emitter, got {other:?}"),
    }
}

// =============================================================================
// Failure policy
// =============================================================================

#[test]
fn test_rejects_unordered_input() {
    let err = compile(&[Note::new(40, 20, 1), Note::new(0, 20, 1)]).unwrap_err();
    assert!(matches!(err, CompileError::UnorderedInput { index: 1, .. }));
}

#[test]
fn test_rejects_negative_start() {
    let err = compile(&[Note::new(-1, 20, 1)]).unwrap_err();
    assert_eq!(err.to_string(), "note 0: start_tick must be non-negative, got -1");
}

#[test]
fn test_document_round_trips_through_json() {
    let result = compile(&[
        Note::new(0, 20, 3),
        Note::new(10, 3000, 3),
        Note::new(2600, 40, 7),
    ])
    .unwrap();
    let parsed = Document::from_json(&result.json).unwrap();
    assert_eq!(parsed.to_json().unwrap(), result.json);
}
