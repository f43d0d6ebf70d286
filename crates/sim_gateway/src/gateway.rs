//! Simulator gateway abstraction
//!
//! Every call is a blocking round trip to the simulator: the returned future
//! resolves only once the simulator has answered. Convergence loops rely on
//! this for their pacing.

use bytes::Bytes;
use contracts::{
    DepthBuffer, ObjectHandle, ParamId, Position, ScriptCall, ScriptReply, SignalMode,
    VisionImage,
};

use crate::error::Result;

/// Simulator gateway trait
///
/// Abstracts the remote API so the control layer can run against a real
/// simulator binding or against [`MockGateway`](crate::MockGateway).
#[trait_variant::make(SimulatorGateway: Send)]
pub trait LocalSimulatorGateway {
    /// Open the connection (closing any previous one first)
    async fn connect(&mut self, host: &str, port: u16) -> Result<()>;

    /// Close the connection. Idempotent.
    async fn disconnect(&mut self) -> Result<()>;

    /// Start or resume the simulation
    async fn start_simulation(&self) -> Result<()>;

    /// Pause the simulation (resume with `start_simulation`)
    async fn pause_simulation(&self) -> Result<()>;

    /// Stop the simulation
    async fn stop_simulation(&self) -> Result<()>;

    /// Print a line in the simulator status bar
    async fn add_status_message(&self, text: &str) -> Result<()>;

    /// Replace the current scene with the scene file at `path`
    async fn load_scene(&self, path: &str) -> Result<()>;

    /// Add the model file at `path` to the current scene
    async fn load_model(&self, path: &str) -> Result<()>;

    /// Resolve a scene object name to its handle
    async fn resolve_handle(&self, name: &str) -> Result<ObjectHandle>;

    /// Absolute object position
    async fn get_position(&self, handle: ObjectHandle) -> Result<Position>;

    /// Teleport an object to an absolute position
    async fn set_position(&self, handle: ObjectHandle, position: Position) -> Result<()>;

    /// Set a joint's target velocity
    async fn set_joint_velocity(&self, handle: ObjectHandle, velocity: f64) -> Result<()>;

    /// Invoke a function of a scene child script
    async fn call_script_function(&self, call: ScriptCall) -> Result<ScriptReply>;

    /// Read a string signal (empty when nothing is available yet)
    async fn get_string_signal(&self, name: &str, mode: SignalMode) -> Result<Bytes>;

    /// Read the RGB raster of a vision sensor
    async fn get_vision_sensor_image(&self, handle: ObjectHandle) -> Result<VisionImage>;

    /// Read the depth buffer of a vision sensor
    async fn get_vision_sensor_depth(&self, handle: ObjectHandle) -> Result<DepthBuffer>;

    /// Read a float object parameter
    async fn get_float_parameter(&self, handle: ObjectHandle, param: ParamId) -> Result<f64>;

    /// Write a float object parameter
    async fn set_float_parameter(
        &self,
        handle: ObjectHandle,
        param: ParamId,
        value: f64,
    ) -> Result<()>;

    /// Read an integer object parameter
    async fn get_int_parameter(&self, handle: ObjectHandle, param: ParamId) -> Result<i64>;

    /// Publish a float signal
    async fn set_float_signal(&self, name: &str, value: f64) -> Result<()>;

    /// Remove a float signal
    async fn clear_float_signal(&self, name: &str) -> Result<()>;
}
