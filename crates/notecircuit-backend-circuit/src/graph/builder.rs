//! Graph construction.
//!
//! Building runs in two passes. The layout pass hands out node ids in
//! emission order:
//!
//! 1. per emitter: OR gate, emitter
//! 2. per duration timer: timer, NOR gate, AND gate
//! 3. per start timer: timer
//! 4. per extension timer: timer
//! 5. the trigger
//!
//! The emission pass then writes nodes in the same order. Because every id is
//! known before the first node is written, links may point forward (an
//! extension to the next one in the chain) as well as backward.

use std::collections::HashSet;

use super::document::Document;
use super::node::{GateMode, GraphNode, NodeId};
use crate::compile::CompileError;
use crate::context::CompileContext;
use crate::timer::TimerRef;

/// Node ids of the three components that voice one duration timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationNodes {
    pub timer: NodeId,
    pub nor: NodeId,
    pub and: NodeId,
}

/// Node ids for every entity of a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// OR gate of each emitter, by emitter index.
    pub or_gates: Vec<NodeId>,
    /// Emitter nodes, by emitter index.
    pub emitters: Vec<NodeId>,
    pub durations: Vec<DurationNodes>,
    pub starts: Vec<NodeId>,
    pub extensions: Vec<NodeId>,
    pub trigger: NodeId,
}

struct IdCounter(u32);

impl IdCounter {
    fn next(&mut self) -> NodeId {
        let id = NodeId(self.0);
        self.0 += 1;
        id
    }
}

impl Layout {
    /// Assigns ids to every component of the context in emission order.
    pub fn assign(ctx: &CompileContext) -> Self {
        let mut ids = IdCounter(0);

        let mut or_gates = Vec::with_capacity(ctx.emitters().len());
        let mut emitters = Vec::with_capacity(ctx.emitters().len());
        for _ in ctx.emitters() {
            or_gates.push(ids.next());
            emitters.push(ids.next());
        }

        let durations = ctx
            .duration_timers()
            .iter()
            .map(|_| DurationNodes {
                timer: ids.next(),
                nor: ids.next(),
                and: ids.next(),
            })
            .collect();
        let starts = ctx.start_timers().iter().map(|_| ids.next()).collect();
        let extensions = ctx.extension_timers().iter().map(|_| ids.next()).collect();
        let trigger = ids.next();

        Self {
            or_gates,
            emitters,
            durations,
            starts,
            extensions,
            trigger,
        }
    }

    /// Node id of the timer component behind a handle.
    pub fn timer(&self, timer: TimerRef) -> Result<NodeId, CompileError> {
        let id = match timer {
            TimerRef::Duration(i) => self.durations.get(i).map(|d| d.timer),
            TimerRef::Start(i) => self.starts.get(i).copied(),
            TimerRef::Extension(i) => self.extensions.get(i).copied(),
        };
        id.ok_or(CompileError::UnknownTimer { timer })
    }

    fn duration(&self, timer: TimerRef) -> Result<DurationNodes, CompileError> {
        match timer {
            TimerRef::Duration(i) => self.durations.get(i).copied(),
            _ => None,
        }
        .ok_or(CompileError::UnknownTimer { timer })
    }
}

/// Timers the trigger starts directly.
///
/// Every distinct start timer without an extension link, in the order notes
/// first reference them, followed by the head of the extension chain if one
/// exists. Extended start timers are reached through the chain instead.
pub fn trigger_timers(ctx: &CompileContext) -> Vec<TimerRef> {
    let mut seen = HashSet::new();
    let mut targets: Vec<TimerRef> = ctx
        .notes()
        .iter()
        .filter_map(|placed| placed.start_timer())
        .filter(|timer| seen.insert(*timer))
        .filter(|timer| ctx.timer(*timer).is_some_and(|t| !t.is_extended()))
        .collect();
    if !ctx.extension_timers().is_empty() {
        targets.push(TimerRef::Extension(0));
    }
    targets
}

/// Builds the document for a fully synthesized context.
///
/// Every registered note must have an emitter, a start timer and a duration
/// timer.
pub fn build_document(ctx: &CompileContext) -> Result<Document, CompileError> {
    for (index, placed) in ctx.notes().iter().enumerate() {
        if placed.emitter().is_none()
            || placed.start_timer().is_none()
            || placed.duration_timer().is_none()
        {
            return Err(CompileError::UnassignedNote { index });
        }
    }

    let layout = Layout::assign(ctx);
    let mut nodes = Vec::with_capacity(ctx.stats().nodes);

    for (index, emitter) in ctx.emitters().iter().enumerate() {
        let or_gate = layout.or_gates[index];
        let node = layout.emitters[index];
        nodes.push(GraphNode::gate(or_gate, GateMode::Or, node));
        nodes.push(GraphNode::emitter(node, emitter));
    }

    for (index, timer) in ctx.duration_timers().iter().enumerate() {
        let handle = TimerRef::Duration(index);
        let ids = layout.duration(handle)?;
        let or_gate = timer
            .emitter
            .and_then(|e| layout.or_gates.get(e.index()).copied())
            .ok_or(CompileError::UnknownTimer { timer: handle })?;
        nodes.push(GraphNode::timer(ids.timer, timer, vec![ids.nor]));
        nodes.push(GraphNode::gate(ids.nor, GateMode::Nor, ids.and));
        nodes.push(GraphNode::gate(ids.and, GateMode::And, or_gate));
    }

    for (index, timer) in ctx.start_timers().iter().enumerate() {
        let mut targets = Vec::with_capacity(timer.notes().len() * 2);
        for note in timer.notes() {
            let duration = ctx
                .note(*note)
                .and_then(|placed| placed.duration_timer())
                .ok_or(CompileError::UnassignedNote {
                    index: note.index(),
                })?;
            let ids = layout.duration(duration)?;
            targets.push(ids.timer);
            targets.push(ids.and);
        }
        nodes.push(GraphNode::timer(layout.starts[index], timer, targets));
    }

    for (index, timer) in ctx.extension_timers().iter().enumerate() {
        let targets = timer
            .linked()
            .iter()
            .map(|linked| layout.timer(*linked))
            .collect::<Result<Vec<_>, _>>()?;
        nodes.push(GraphNode::timer(layout.extensions[index], timer, targets));
    }

    let trigger_targets = trigger_timers(ctx)
        .into_iter()
        .map(|timer| layout.timer(timer))
        .collect::<Result<Vec<_>, _>>()?;
    nodes.push(GraphNode::trigger(layout.trigger, trigger_targets));

    Ok(Document::new(nodes))
}
