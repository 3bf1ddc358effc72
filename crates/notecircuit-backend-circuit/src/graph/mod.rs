//! Circuit graph: node model, document envelope and the builder that lays
//! out a synthesized context as a document.

mod builder;
mod document;
mod node;
pub mod shape;

pub use builder::{build_document, trigger_timers, DurationNodes, Layout};
pub use document::{Body, Document};
pub use node::{
    Controller, EmitterController, GateController, GateMode, GraphNode, Link, NodeId, Position,
    TimerController, TriggerController,
};
