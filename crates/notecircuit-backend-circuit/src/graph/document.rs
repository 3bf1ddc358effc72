//! Document envelope.

use serde::{Deserialize, Serialize};

use super::node::{GraphNode, NodeId};
use super::shape::DOCUMENT_VERSION;
use crate::compile::CompileError;

/// One body holding every node of the circuit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub childs: Vec<GraphNode>,
}

/// Top-level importable document.
///
/// Serializes as `{"bodies":[{"childs":[...]}],"version":3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub bodies: Vec<Body>,
    pub version: u32,
}

impl Document {
    /// Wraps nodes, already in emission order, in a single body.
    pub fn new(nodes: Vec<GraphNode>) -> Self {
        Self {
            bodies: vec![Body { childs: nodes }],
            version: DOCUMENT_VERSION,
        }
    }

    /// Compact JSON, the form the importer reads.
    pub fn to_json(&self) -> Result<String, CompileError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON for humans.
    pub fn to_json_pretty(&self) -> Result<String, CompileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a document.
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Iterates every node across all bodies.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.bodies.iter().flat_map(|body| body.childs.iter())
    }

    pub fn node_count(&self) -> usize {
        self.bodies.iter().map(|body| body.childs.len()).sum()
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes().find(|node| node.id() == id)
    }

    /// The trigger node, which is always emitted last.
    pub fn trigger(&self) -> Option<&GraphNode> {
        self.nodes().last()
    }
}
