//! Mock simulator gateway
//!
//! In-process kinematic double used by unit tests, end-to-end tests and the
//! offline server mode. Supports failure injection and records every call.
//!
//! Kinematics are deliberately coarse: each position poll of a robot's
//! position target moves it by a fixed step along the direction implied by
//! its wheel velocities, and each heading poll turns it by a fixed step while
//! a `Turn` is active.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::{BufMut, Bytes, BytesMut};
use contracts::{
    script_fn, DepthBuffer, ObjectHandle, ParamId, Part, Position, ScriptCall, ScriptReply,
    SignalMode, VisionImage, SUFFIXES,
};
use tracing::{debug, instrument};

use crate::error::{GatewayError, Result};
use crate::gateway::SimulatorGateway;

const EPSILON: f64 = 1e-12;

/// Mock gateway configuration
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Refuse every connection attempt
    pub fail_connect: bool,
    /// Model paths whose load fails
    pub fail_models: Vec<String>,
    /// Object names (suffix included) never registered in the scene
    pub missing_objects: Vec<String>,
    /// Base object names created by each model load
    pub model_objects: Vec<String>,
    /// Base name of the script object created by each model load
    pub robot_script: String,
    /// Base name of the object whose position reflects the robot pose
    pub position_target: String,
    /// Base name of the robot root object
    pub body: String,
    /// Base names of the wheel joints, RR, RL, FR, FL
    pub wheels: [String; 4],
    /// Distance covered per position poll while driving
    pub linear_step: f64,
    /// Heading change per angle poll while turning
    pub angular_step: f64,
    /// RGB raster size
    pub image_size: (u32, u32),
    /// Depth buffer size
    pub depth_size: (u32, u32),
    /// Signal carrying LIDAR ranges
    pub lidar_signal: String,
    /// Ranges published on the LIDAR signal
    pub lidar_ranges: Vec<f32>,
    /// Buffered reads answered empty before ranges become available
    pub lidar_empty_reads: u32,
    /// Answer the streaming subscribe with ranges already
    pub lidar_on_subscribe: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fail_connect: false,
            fail_models: Vec::new(),
            missing_objects: Vec::new(),
            model_objects: Part::ALL
                .iter()
                .map(|p| p.object_name().to_string())
                .collect(),
            robot_script: "youBot_ref".to_string(),
            position_target: Part::PositionTarget.object_name().to_string(),
            body: Part::Body.object_name().to_string(),
            wheels: Part::WHEELS.map(|p| p.object_name().to_string()),
            linear_step: 0.05,
            angular_step: 0.05,
            image_size: (640, 480),
            depth_size: (640, 480),
            lidar_signal: "scan ranges".to_string(),
            lidar_ranges: vec![1.0; 684],
            lidar_empty_reads: 1,
            lidar_on_subscribe: false,
        }
    }
}

/// Recorded gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Connect { host: String, port: u16 },
    Disconnect,
    StartSimulation,
    PauseSimulation,
    StopSimulation,
    StatusMessage(String),
    LoadScene(String),
    LoadModel(String),
    ResolveHandle(String),
    GetPosition(ObjectHandle),
    SetPosition(ObjectHandle, Position),
    SetJointVelocity(ObjectHandle, f64),
    CallScript {
        script: String,
        function: String,
        floats: Vec<f32>,
    },
    GetStringSignal(String, SignalMode),
    GetVisionImage(ObjectHandle),
    GetVisionDepth(ObjectHandle),
    GetFloatParameter(ObjectHandle, ParamId),
    SetFloatParameter(ObjectHandle, ParamId, f64),
    GetIntParameter(ObjectHandle, ParamId),
    SetFloatSignal(String, f64),
    ClearFloatSignal(String),
}

/// Simulation run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// One loaded copy of the robot model
#[derive(Debug)]
struct ModelInstance {
    script: String,
    body: Option<ObjectHandle>,
    position_target: Option<ObjectHandle>,
    wheels: [Option<ObjectHandle>; 4],
    heading: f64,
    turn_speed: f64,
}

#[derive(Debug, Default)]
struct MockState {
    connected: bool,
    simulation: SimulationState,
    scene: Option<String>,
    models: Vec<String>,
    next_handle: ObjectHandle,
    objects: HashMap<String, ObjectHandle>,
    instances: Vec<ModelInstance>,
    positions: HashMap<ObjectHandle, Position>,
    velocities: HashMap<ObjectHandle, f64>,
    float_params: HashMap<(ObjectHandle, ParamId), f64>,
    float_signals: HashMap<String, f64>,
    lidar_subscribed: bool,
    lidar_reads: u32,
    status_messages: Vec<String>,
    calls: Vec<GatewayCall>,
}

impl MockState {
    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(GatewayError::NotConnected)
        }
    }

    fn ensure_object(&self, handle: ObjectHandle, call: &str) -> Result<()> {
        if self.objects.values().any(|h| *h == handle) {
            Ok(())
        } else {
            Err(GatewayError::rpc(call, format!("invalid object handle {handle}")))
        }
    }

    fn clear_scene(&mut self) {
        self.models.clear();
        self.objects.clear();
        self.instances.clear();
        self.positions.clear();
        self.velocities.clear();
        self.float_params.clear();
    }

    fn register(&mut self, name: String) -> ObjectHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.objects.insert(name, handle);
        handle
    }

    fn instance_by_target(&self, handle: ObjectHandle) -> Option<usize> {
        self.instances
            .iter()
            .position(|i| i.position_target == Some(handle))
    }
}

/// Mock simulator gateway
pub struct MockGateway {
    /// Configuration (failure injection and kinematics)
    config: MockConfig,
    state: Mutex<MockState>,
}

impl MockGateway {
    /// Create default mock gateway
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    /// Create mock gateway from configuration
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            state: Mutex::new(MockState {
                // Start at 100 so handles are easy to spot in logs
                next_handle: 100,
                ..Default::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: GatewayCall) -> MutexGuard<'_, MockState> {
        let mut state = self.state();
        state.calls.push(call);
        state
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// All calls issued so far, in order
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().calls.clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Number of recorded calls matching `pred`
    pub fn count_calls(&self, pred: impl Fn(&GatewayCall) -> bool) -> usize {
        self.state().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn is_connected(&self) -> bool {
        self.state().connected
    }

    pub fn simulation_state(&self) -> SimulationState {
        self.state().simulation
    }

    pub fn scene(&self) -> Option<String> {
        self.state().scene.clone()
    }

    /// Model paths loaded into the current scene
    pub fn loaded_models(&self) -> Vec<String> {
        self.state().models.clone()
    }

    pub fn status_messages(&self) -> Vec<String> {
        self.state().status_messages.clone()
    }

    pub fn handle_of(&self, name: &str) -> Option<ObjectHandle> {
        self.state().objects.get(name).copied()
    }

    /// Current position without advancing the kinematics
    pub fn position_of(&self, handle: ObjectHandle) -> Option<Position> {
        self.state().positions.get(&handle).copied()
    }

    pub fn joint_velocity(&self, handle: ObjectHandle) -> Option<f64> {
        self.state().velocities.get(&handle).copied()
    }

    pub fn float_parameter(&self, handle: ObjectHandle, param: ParamId) -> Option<f64> {
        self.state().float_params.get(&(handle, param)).copied()
    }

    /// Store a parameter value directly, bypassing the recorded API
    pub fn preset_float_parameter(&self, handle: ObjectHandle, param: ParamId, value: f64) {
        self.state().float_params.insert((handle, param), value);
    }

    pub fn float_signal(&self, name: &str) -> Option<f64> {
        self.state().float_signals.get(name).copied()
    }

    fn advance(&self, state: &mut MockState, idx: usize) -> Option<Position> {
        let instance = &state.instances[idx];
        let target = instance.position_target?;
        let [rr, rl, fr, fl] = instance
            .wheels
            .map(|w| w.and_then(|h| state.velocities.get(&h).copied()).unwrap_or(0.0));

        let longitudinal = -(rr + rl + fr + fl) / 4.0;
        let lateral = (rr - rl + fr - fl) / 4.0;
        let step = |v: f64| {
            if v.abs() < EPSILON {
                0.0
            } else {
                self.config.linear_step * v.signum()
            }
        };
        let (dx, dy) = (step(longitudinal), step(lateral));

        let position = state.positions.entry(target).or_default();
        position.x += dx;
        position.y += dy;
        let moved = *position;

        if let Some(body) = state.instances[idx].body {
            state.positions.insert(body, moved);
        }
        Some(moved)
    }

    fn lidar_payload(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.config.lidar_ranges.len() * 4);
        for range in &self.config.lidar_ranges {
            buf.put_f32_le(*range);
        }
        buf.freeze()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorGateway for MockGateway {
    #[instrument(name = "mock_gateway_connect", skip(self), fields(host = %host, port))]
    async fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        let mut state = self.record(GatewayCall::Connect {
            host: host.to_string(),
            port,
        });
        if self.config.fail_connect {
            state.connected = false;
            return Err(GatewayError::ConnectionFailed {
                host: host.to_string(),
                port,
                message: "mock failure".into(),
            });
        }
        state.connected = true;
        Ok(())
    }

    #[instrument(name = "mock_gateway_disconnect", skip(self))]
    async fn disconnect(&mut self) -> Result<()> {
        // Idempotent: succeeds without a connection too
        let mut state = self.record(GatewayCall::Disconnect);
        state.connected = false;
        Ok(())
    }

    async fn start_simulation(&self) -> Result<()> {
        let mut state = self.record(GatewayCall::StartSimulation);
        state.ensure_connected()?;
        state.simulation = SimulationState::Running;
        Ok(())
    }

    async fn pause_simulation(&self) -> Result<()> {
        let mut state = self.record(GatewayCall::PauseSimulation);
        state.ensure_connected()?;
        state.simulation = SimulationState::Paused;
        Ok(())
    }

    async fn stop_simulation(&self) -> Result<()> {
        let mut state = self.record(GatewayCall::StopSimulation);
        state.ensure_connected()?;
        state.simulation = SimulationState::Stopped;
        Ok(())
    }

    async fn add_status_message(&self, text: &str) -> Result<()> {
        let mut state = self.record(GatewayCall::StatusMessage(text.to_string()));
        state.ensure_connected()?;
        state.status_messages.push(text.to_string());
        Ok(())
    }

    #[instrument(name = "mock_gateway_load_scene", skip(self), fields(path = %path))]
    async fn load_scene(&self, path: &str) -> Result<()> {
        let mut state = self.record(GatewayCall::LoadScene(path.to_string()));
        state.ensure_connected()?;
        state.clear_scene();
        state.scene = Some(path.to_string());
        Ok(())
    }

    #[instrument(name = "mock_gateway_load_model", skip(self), fields(path = %path))]
    async fn load_model(&self, path: &str) -> Result<()> {
        let mut state = self.record(GatewayCall::LoadModel(path.to_string()));
        state.ensure_connected()?;

        if self.config.fail_models.iter().any(|m| m == path) {
            return Err(GatewayError::rpc("load_model", format!("cannot load '{path}'")));
        }
        let copy = state.instances.len();
        let suffix = SUFFIXES
            .get(copy)
            .ok_or_else(|| GatewayError::rpc("load_model", "too many copies of the model"))?;

        let mut registered = HashMap::new();
        for base in &self.config.model_objects {
            let name = format!("{base}{suffix}");
            if self.config.missing_objects.contains(&name) {
                continue;
            }
            let handle = state.register(name);
            registered.insert(base.as_str(), handle);
        }

        let lookup = |base: &str| registered.get(base).copied();
        let instance = ModelInstance {
            script: format!("{}{suffix}", self.config.robot_script),
            body: lookup(&self.config.body),
            position_target: lookup(&self.config.position_target),
            wheels: [
                lookup(&self.config.wheels[0]),
                lookup(&self.config.wheels[1]),
                lookup(&self.config.wheels[2]),
                lookup(&self.config.wheels[3]),
            ],
            heading: 0.0,
            turn_speed: 0.0,
        };

        // Copies are dropped side by side along y
        let start = Position::new(0.0, copy as f64, 0.0);
        for handle in [instance.body, instance.position_target].into_iter().flatten() {
            state.positions.insert(handle, start);
        }
        state.instances.push(instance);
        state.models.push(path.to_string());

        debug!(path, copy, suffix, "mock model loaded");
        Ok(())
    }

    #[instrument(name = "mock_gateway_resolve_handle", skip(self), fields(name = %name))]
    async fn resolve_handle(&self, name: &str) -> Result<ObjectHandle> {
        let state = self.record(GatewayCall::ResolveHandle(name.to_string()));
        state.ensure_connected()?;
        state
            .objects
            .get(name)
            .copied()
            .ok_or_else(|| GatewayError::ObjectNotFound {
                name: name.to_string(),
            })
    }

    async fn get_position(&self, handle: ObjectHandle) -> Result<Position> {
        let mut state = self.record(GatewayCall::GetPosition(handle));
        state.ensure_connected()?;
        state.ensure_object(handle, "get_position")?;

        if let Some(idx) = state.instance_by_target(handle) {
            if let Some(position) = self.advance(&mut state, idx) {
                return Ok(position);
            }
        }
        Ok(state.positions.get(&handle).copied().unwrap_or_default())
    }

    async fn set_position(&self, handle: ObjectHandle, position: Position) -> Result<()> {
        let mut state = self.record(GatewayCall::SetPosition(handle, position));
        state.ensure_connected()?;
        state.ensure_object(handle, "set_position")?;

        state.positions.insert(handle, position);
        // Moving the root drags the position target along
        let target = state
            .instances
            .iter()
            .find(|i| i.body == Some(handle))
            .and_then(|i| i.position_target);
        if let Some(target) = target {
            state.positions.insert(target, position);
        }
        Ok(())
    }

    async fn set_joint_velocity(&self, handle: ObjectHandle, velocity: f64) -> Result<()> {
        let mut state = self.record(GatewayCall::SetJointVelocity(handle, velocity));
        state.ensure_connected()?;
        state.ensure_object(handle, "set_joint_velocity")?;
        state.velocities.insert(handle, velocity);
        Ok(())
    }

    async fn call_script_function(&self, call: ScriptCall) -> Result<ScriptReply> {
        let mut state = self.record(GatewayCall::CallScript {
            script: call.script.clone(),
            function: call.function.clone(),
            floats: call.floats.clone(),
        });
        state.ensure_connected()?;

        let step = self.config.angular_step;
        let instance = state
            .instances
            .iter_mut()
            .find(|i| i.script == call.script)
            .ok_or_else(|| {
                GatewayError::script_call(&call.script, &call.function, "script not found")
            })?;

        match call.function.as_str() {
            script_fn::GET_ROBOT_ANGLE => {
                if instance.turn_speed.abs() > EPSILON {
                    instance.heading += step * instance.turn_speed.signum();
                }
                Ok(ScriptReply {
                    floats: vec![instance.heading as f32],
                    ..Default::default()
                })
            }
            script_fn::TURN => {
                let speed = call.floats.first().copied().ok_or_else(|| {
                    GatewayError::script_call(&call.script, &call.function, "missing speed")
                })?;
                instance.turn_speed = f64::from(speed);
                Ok(ScriptReply::default())
            }
            other => Err(GatewayError::script_call(
                &call.script,
                other,
                "unknown function",
            )),
        }
    }

    async fn get_string_signal(&self, name: &str, mode: SignalMode) -> Result<Bytes> {
        let mut state = self.record(GatewayCall::GetStringSignal(name.to_string(), mode));
        state.ensure_connected()?;

        if name != self.config.lidar_signal {
            return Ok(Bytes::new());
        }
        match mode {
            SignalMode::Streaming => {
                state.lidar_subscribed = true;
                state.lidar_reads = 0;
                if self.config.lidar_on_subscribe {
                    Ok(self.lidar_payload())
                } else {
                    Ok(Bytes::new())
                }
            }
            SignalMode::Buffer if !state.lidar_subscribed => Ok(Bytes::new()),
            SignalMode::Buffer | SignalMode::Blocking => {
                if state.lidar_reads < self.config.lidar_empty_reads {
                    state.lidar_reads += 1;
                    Ok(Bytes::new())
                } else {
                    Ok(self.lidar_payload())
                }
            }
        }
    }

    async fn get_vision_sensor_image(&self, handle: ObjectHandle) -> Result<VisionImage> {
        let state = self.record(GatewayCall::GetVisionImage(handle));
        state.ensure_connected()?;
        state.ensure_object(handle, "get_vision_sensor_image")?;

        let (width, height) = self.config.image_size;
        let mut pixels = BytesMut::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                pixels.put_slice(&[x as u8, y as u8, (x + y) as u8]);
            }
        }
        Ok(VisionImage {
            width,
            height,
            pixels: pixels.freeze(),
        })
    }

    async fn get_vision_sensor_depth(&self, handle: ObjectHandle) -> Result<DepthBuffer> {
        let state = self.record(GatewayCall::GetVisionDepth(handle));
        state.ensure_connected()?;
        state.ensure_object(handle, "get_vision_sensor_depth")?;

        let (width, height) = self.config.depth_size;
        let len = width as usize * height as usize;
        let values = (0..len).map(|i| i as f32 / len as f32).collect();
        Ok(DepthBuffer {
            width,
            height,
            values,
        })
    }

    async fn get_float_parameter(&self, handle: ObjectHandle, param: ParamId) -> Result<f64> {
        let state = self.record(GatewayCall::GetFloatParameter(handle, param));
        state.ensure_connected()?;
        state.ensure_object(handle, "get_float_parameter")?;
        Ok(state
            .float_params
            .get(&(handle, param))
            .copied()
            .unwrap_or_default())
    }

    async fn set_float_parameter(
        &self,
        handle: ObjectHandle,
        param: ParamId,
        value: f64,
    ) -> Result<()> {
        let mut state = self.record(GatewayCall::SetFloatParameter(handle, param, value));
        state.ensure_connected()?;
        state.ensure_object(handle, "set_float_parameter")?;
        state.float_params.insert((handle, param), value);
        Ok(())
    }

    async fn get_int_parameter(&self, handle: ObjectHandle, param: ParamId) -> Result<i64> {
        let state = self.record(GatewayCall::GetIntParameter(handle, param));
        state.ensure_connected()?;
        state.ensure_object(handle, "get_int_parameter")?;
        Ok(state
            .float_params
            .get(&(handle, param))
            .map(|v| v.round() as i64)
            .unwrap_or_default())
    }

    async fn set_float_signal(&self, name: &str, value: f64) -> Result<()> {
        let mut state = self.record(GatewayCall::SetFloatSignal(name.to_string(), value));
        state.ensure_connected()?;
        state.float_signals.insert(name.to_string(), value);
        Ok(())
    }

    async fn clear_float_signal(&self, name: &str) -> Result<()> {
        let mut state = self.record(GatewayCall::ClearFloatSignal(name.to_string()));
        state.ensure_connected()?;
        state.float_signals.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn heading(gateway: &MockGateway, script: &str) -> f32 {
        let call = ScriptCall::new(script, script_fn::GET_ROBOT_ANGLE);
        gateway.call_script_function(call).await.unwrap().floats[0]
    }

    async fn connected() -> MockGateway {
        let mut gateway = MockGateway::new();
        gateway.connect("127.0.0.1", 19997).await.unwrap();
        gateway
    }

    #[tokio::test]
    async fn test_calls_require_connection() {
        let gateway = MockGateway::new();
        let err = gateway.load_scene("Scenes/Simple.ttt").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConnected));
    }

    #[tokio::test]
    async fn test_connect_failure_injection() {
        let mut gateway = MockGateway::with_config(MockConfig {
            fail_connect: true,
            ..Default::default()
        });
        let err = gateway.connect("10.0.0.1", 19997).await.unwrap_err();
        assert!(err.is_unreachable());
        assert!(!gateway.is_connected());
    }

    #[tokio::test]
    async fn test_model_copies_get_simulator_style_suffixes() {
        let gateway = connected().await;
        gateway.load_model("Models/youBot.ttm").await.unwrap();
        gateway.load_model("Models/youBot.ttm").await.unwrap();

        assert!(gateway.resolve_handle("youBot").await.is_ok());
        assert!(gateway.resolve_handle("youBot#0").await.is_ok());
        let err = gateway.resolve_handle("youBot#1").await.unwrap_err();
        assert!(matches!(err, GatewayError::ObjectNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_objects_are_not_registered() {
        let mut gateway = MockGateway::with_config(MockConfig {
            missing_objects: vec!["kinect_rgb".to_string()],
            ..Default::default()
        });
        gateway.connect("127.0.0.1", 19997).await.unwrap();
        gateway.load_model("Models/youBot.ttm").await.unwrap();

        assert!(gateway.handle_of("kinect_rgb").is_none());
        assert!(gateway.handle_of("kinect_depth").is_some());
    }

    #[tokio::test]
    async fn test_position_advances_only_while_driving() {
        let gateway = connected().await;
        gateway.load_model("Models/youBot.ttm").await.unwrap();
        let target = gateway.handle_of("youBot_positionTarget").unwrap();

        let idle = gateway.get_position(target).await.unwrap();
        assert_eq!(idle, Position::ORIGIN);

        for wheel in ["rollingJoint_rr", "rollingJoint_rl", "rollingJoint_fr", "rollingJoint_fl"] {
            let handle = gateway.handle_of(wheel).unwrap();
            gateway.set_joint_velocity(handle, -1.0).await.unwrap();
        }
        let moved = gateway.get_position(target).await.unwrap();
        assert!((moved.x - gateway.config().linear_step).abs() < 1e-12);
        assert_eq!(moved.y, 0.0);
    }

    #[tokio::test]
    async fn test_turn_script_integrates_heading() {
        let gateway = connected().await;
        gateway.load_model("Models/youBot.ttm").await.unwrap();

        assert_eq!(heading(&gateway, "youBot_ref").await, 0.0);

        let turn = ScriptCall::new("youBot_ref", script_fn::TURN).with_floats(vec![1.0]);
        gateway.call_script_function(turn).await.unwrap();
        assert!(heading(&gateway, "youBot_ref").await > 0.0);

        let unknown = ScriptCall::new("youBot_ref#3", script_fn::TURN).with_floats(vec![1.0]);
        assert!(gateway.call_script_function(unknown).await.is_err());
    }

    #[tokio::test]
    async fn test_lidar_signal_needs_subscription() {
        let gateway = connected().await;
        let signal = "scan ranges";

        assert!(gateway
            .get_string_signal(signal, SignalMode::Buffer)
            .await
            .unwrap()
            .is_empty());
        assert!(gateway
            .get_string_signal(signal, SignalMode::Streaming)
            .await
            .unwrap()
            .is_empty());
        // One empty buffered read by default
        assert!(gateway
            .get_string_signal(signal, SignalMode::Buffer)
            .await
            .unwrap()
            .is_empty());
        let payload = gateway
            .get_string_signal(signal, SignalMode::Buffer)
            .await
            .unwrap();
        assert_eq!(payload.len(), 684 * 4);
    }

    #[tokio::test]
    async fn test_load_scene_clears_models() {
        let gateway = connected().await;
        gateway.load_model("Models/youBot.ttm").await.unwrap();
        gateway.load_scene("Scenes/Other.ttt").await.unwrap();

        assert!(gateway.loaded_models().is_empty());
        assert!(gateway.handle_of("youBot").is_none());
        assert_eq!(gateway.scene().as_deref(), Some("Scenes/Other.ttt"));
    }
}
