//! Fixed component table of the target runtime.
//!
//! Shape identifiers are opaque type tags the importer uses to pick the part
//! to spawn. They must match exactly.

use notecircuit_spec::{EmitterKind, PITCH_CLASS_MAX};

/// Logic gate (AND, OR, NOR are modes of one part).
pub const LOGIC_GATE_SHAPE: &str = "9f0f56e8-2c31-4d83-996c-d00a9b296c3f";

/// Interval timer.
pub const TIMER_SHAPE: &str = "8f7fd0e7-c46e-4944-a414-7ce2437bb30f";

/// Push button that starts the circuit.
pub const TRIGGER_SHAPE: &str = "7cf717d7-d167-4f2d-a6e7-6b2c70aa3986";

/// Color of every gate, timer, and the trigger.
pub const COMPONENT_COLOR: &str = "df7f01";

/// Emitter volume written into every emitter controller.
pub const EMITTER_VOLUME: u32 = 50;

/// Document format version.
pub const DOCUMENT_VERSION: u32 = 3;

/// Placeholder orientation of ordinary components.
pub const COMPONENT_AXES: (i32, i32) = (-2, -1);

/// Orientation of the trigger.
pub const TRIGGER_AXES: (i32, i32) = (3, -1);

/// Shape identifier of an emitter family.
pub fn emitter_shape(kind: EmitterKind) -> &'static str {
    match kind {
        EmitterKind::Default => "1c04327f-1de4-4b06-92a8-2c9b40e491aa",
        EmitterKind::Bass => "161786c1-1290-4817-8f8b-7f80de755a06",
        EmitterKind::Synth => "a052e116-f273-4d73-872c-924a97b86720",
        EmitterKind::Percussion => "4c6e27a2-4c35-4df3-9794-5e206fef9012",
    }
}

/// Audio pitch of a pitch class, in `0.0..=1.0`.
pub fn emitter_pitch(pitch_class: i32) -> f32 {
    pitch_class as f32 / PITCH_CLASS_MAX as f32
}

/// Grey level derived from the pitch, as `rrggbb` hex with equal channels.
pub fn emitter_color(pitch: f32) -> String {
    // Truncating cast matches the importer's integer conversion.
    let level = (255.0_f32 * pitch) as i32;
    let channel = format!("{:02x}", level);
    channel.repeat(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitter_shapes_are_distinct() {
        let mut shapes: Vec<&str> = EmitterKind::ALL.iter().map(|k| emitter_shape(*k)).collect();
        shapes.sort_unstable();
        shapes.dedup();
        assert_eq!(shapes.len(), 4);
        assert!(!shapes.contains(&LOGIC_GATE_SHAPE));
        assert!(!shapes.contains(&TIMER_SHAPE));
    }

    #[test]
    fn test_emitter_pitch() {
        assert_eq!(emitter_pitch(0), 0.0);
        assert_eq!(emitter_pitch(12), 0.5);
        assert_eq!(emitter_pitch(24), 1.0);
        assert_eq!(emitter_pitch(1), 1.0_f32 / 24.0_f32);
    }

    #[test]
    fn test_emitter_color() {
        assert_eq!(emitter_color(emitter_pitch(0)), "000000");
        assert_eq!(emitter_color(emitter_pitch(12)), "7f7f7f");
        assert_eq!(emitter_color(emitter_pitch(24)), "ffffff");
        // 255 * (1/24) = 10.625 truncates to 10.
        assert_eq!(emitter_color(emitter_pitch(1)), "0a0a0a");
    }
}
