//! Serialized graph nodes.
//!
//! Field order and names follow the importer's schema; serde writes struct
//! fields in declaration order, so the declarations below fix the byte layout.

use serde::{Deserialize, Serialize, Serializer};

use super::shape::{
    emitter_color, emitter_pitch, emitter_shape, COMPONENT_AXES, COMPONENT_COLOR, EMITTER_VOLUME,
    LOGIC_GATE_SHAPE, TIMER_SHAPE, TRIGGER_AXES, TRIGGER_SHAPE,
};
use crate::allocator::Emitter;
use crate::timer::Timer;

/// Identifier of a node within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Outgoing connection from a node to one it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: NodeId,
}

impl From<NodeId> for Link {
    fn from(id: NodeId) -> Self {
        Self { id }
    }
}

/// Logic gate mode, written as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum GateMode {
    And,
    Or,
    Nor,
}

impl From<GateMode> for u8 {
    fn from(mode: GateMode) -> Self {
        match mode {
            GateMode::And => 0,
            GateMode::Or => 1,
            GateMode::Nor => 4,
        }
    }
}

impl TryFrom<u8> for GateMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GateMode::And),
            1 => Ok(GateMode::Or),
            4 => Ok(GateMode::Nor),
            other => Err(format!("unsupported gate mode: {}", other)),
        }
    }
}

/// Controller block of a logic gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateController {
    pub active: bool,
    pub controllers: Vec<Link>,
    pub id: NodeId,
    pub joints: Option<Vec<Link>>,
    pub mode: GateMode,
}

/// Controller block of an emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitterController {
    #[serde(rename = "audioIndex")]
    pub audio_index: u32,
    pub controllers: Option<Vec<Link>>,
    pub id: NodeId,
    pub joints: Option<Vec<Link>>,
    #[serde(serialize_with = "serialize_pitch")]
    pub pitch: f32,
    pub volume: u32,
}

/// Controller block of a timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerController {
    pub active: bool,
    pub controllers: Vec<Link>,
    pub id: NodeId,
    pub joints: Option<Vec<Link>>,
    pub seconds: u64,
    pub ticks: u64,
}

/// Controller block of the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerController {
    pub active: bool,
    pub controllers: Vec<Link>,
    pub id: NodeId,
    pub joints: Option<Vec<Link>>,
}

/// Kind-specific controller block.
///
/// Untagged: variants are told apart by their distinguishing fields, so the
/// trigger (which has none) must stay last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Controller {
    Gate(GateController),
    Emitter(EmitterController),
    Timer(TimerController),
    Trigger(TriggerController),
}

impl Controller {
    /// Id of the node owning this controller.
    pub fn id(&self) -> NodeId {
        match self {
            Controller::Gate(c) => c.id,
            Controller::Emitter(c) => c.id,
            Controller::Timer(c) => c.id,
            Controller::Trigger(c) => c.id,
        }
    }

    /// Ids of the nodes this one drives.
    pub fn links(&self) -> Vec<NodeId> {
        let links = match self {
            Controller::Gate(c) => Some(&c.controllers),
            Controller::Emitter(c) => c.controllers.as_ref(),
            Controller::Timer(c) => Some(&c.controllers),
            Controller::Trigger(c) => Some(&c.controllers),
        };
        links
            .map(|l| l.iter().map(|link| link.id).collect())
            .unwrap_or_default()
    }
}

/// Integer grid position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// One component of the circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub color: String,
    pub controller: Controller,
    pub pos: Position,
    #[serde(rename = "shapeId")]
    pub shape_id: String,
    pub xaxis: i32,
    pub zaxis: i32,
}

impl GraphNode {
    fn component(controller: Controller, shape_id: &str) -> Self {
        Self {
            color: COMPONENT_COLOR.to_string(),
            controller,
            pos: Position::default(),
            shape_id: shape_id.to_string(),
            xaxis: COMPONENT_AXES.0,
            zaxis: COMPONENT_AXES.1,
        }
    }

    /// A logic gate driving a single node.
    pub fn gate(id: NodeId, mode: GateMode, target: NodeId) -> Self {
        Self::component(
            Controller::Gate(GateController {
                active: true,
                controllers: vec![target.into()],
                id,
                joints: None,
                mode,
            }),
            LOGIC_GATE_SHAPE,
        )
    }

    /// An emitter node. Emitters drive nothing.
    pub fn emitter(id: NodeId, emitter: &Emitter) -> Self {
        let pitch = emitter_pitch(emitter.pitch_class);
        Self {
            color: emitter_color(pitch),
            controller: Controller::Emitter(EmitterController {
                audio_index: emitter.variant.audio_index(),
                controllers: None,
                id,
                joints: None,
                pitch,
                volume: EMITTER_VOLUME,
            }),
            pos: Position::default(),
            shape_id: emitter_shape(emitter.kind).to_string(),
            xaxis: COMPONENT_AXES.0,
            zaxis: COMPONENT_AXES.1,
        }
    }

    /// An inactive timer holding the timer's per-component value.
    pub fn timer(id: NodeId, timer: &Timer, targets: Vec<NodeId>) -> Self {
        Self::component(
            Controller::Timer(TimerController {
                active: false,
                controllers: targets.into_iter().map(Link::from).collect(),
                id,
                joints: None,
                seconds: timer.seconds,
                ticks: timer.ticks,
            }),
            TIMER_SHAPE,
        )
    }

    /// The trigger that starts playback.
    pub fn trigger(id: NodeId, targets: Vec<NodeId>) -> Self {
        Self {
            color: COMPONENT_COLOR.to_string(),
            controller: Controller::Trigger(TriggerController {
                active: true,
                controllers: targets.into_iter().map(Link::from).collect(),
                id,
                joints: None,
            }),
            pos: Position { x: 0, y: 0, z: 1 },
            shape_id: TRIGGER_SHAPE.to_string(),
            xaxis: TRIGGER_AXES.0,
            zaxis: TRIGGER_AXES.1,
        }
    }

    pub fn id(&self) -> NodeId {
        self.controller.id()
    }

    pub fn links(&self) -> Vec<NodeId> {
        self.controller.links()
    }
}

/// Writes whole-number pitches without a fractional part (`0`, `1`), others
/// in shortest round-trip form.
fn serialize_pitch<S: Serializer>(pitch: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    if pitch.fract() == 0.0 {
        serializer.serialize_i64(*pitch as i64)
    } else {
        serializer.serialize_f32(*pitch)
    }
}
