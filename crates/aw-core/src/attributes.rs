//! 3D attributes for event instances

use serde::{Deserialize, Serialize};

/// Spatial attributes applied to an event instance.
///
/// Units are world units for position, units per second for velocity.
/// Forward and up must be normalized and orthogonal; the runtime does not
/// re-normalize them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attributes3d {
    /// Emitter position
    pub position: [f32; 3],
    /// Emitter velocity (for doppler)
    pub velocity: [f32; 3],
    /// Forward direction
    pub forward: [f32; 3],
    /// Up direction
    pub up: [f32; 3],
}

impl Default for Attributes3d {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            velocity: [0.0; 3],
            forward: [0.0, 0.0, -1.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

impl Attributes3d {
    /// Attributes at a position, stationary, default orientation
    pub fn at_position(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}
