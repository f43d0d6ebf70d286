//! Scene-side script calls and signal read modes

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Script function names exposed by the robot's control script.
///
/// This is a fixed external protocol: `GetRobotAngle` takes no arguments and
/// answers `floats[0]` = current heading; `Turn` takes `floats[0]` = angular
/// speed (0.0 stops the rotation) and answers nothing.
pub mod script_fn {
    pub const GET_ROBOT_ANGLE: &str = "GetRobotAngle";
    pub const TURN: &str = "Turn";
}

/// Remote script function invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptCall {
    /// Scene object owning the child script
    pub script: String,
    /// Function name inside the script
    pub function: String,
    pub ints: Vec<i32>,
    pub floats: Vec<f32>,
    pub strings: Vec<String>,
    pub buffer: Bytes,
}

impl ScriptCall {
    pub fn new(script: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            function: function.into(),
            ..Default::default()
        }
    }

    pub fn with_floats(mut self, floats: Vec<f32>) -> Self {
        self.floats = floats;
        self
    }
}

/// Values returned by a script function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptReply {
    pub ints: Vec<i32>,
    pub floats: Vec<f32>,
    pub strings: Vec<String>,
    pub buffer: Bytes,
}

/// Read mode for streamed signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalMode {
    /// Subscribe; the first answer is usually empty
    Streaming,
    /// Read the latest value buffered by a previous subscription
    Buffer,
    /// Round trip to the simulator
    Blocking,
}
