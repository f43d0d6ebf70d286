//! Runtime primitives exchanged with the simulator

use serde::{Deserialize, Serialize};

/// Simulator object handle type
pub type ObjectHandle = i32;

/// Simulator object parameter identifier
pub type ParamId = i32;

/// Public robot identifier (fleet creation order)
pub type RobotIndex = usize;

/// Absolute position in the scene frame (meters)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance on the ground plane (height ignored)
    pub fn planar_distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
