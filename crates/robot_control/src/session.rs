//! Session: the simulator connection, its scene and its fleet
//!
//! Owns the gateway and every robot. One method per network command.

use std::time::Duration;

use contracts::{
    ConvergenceLimit, Drive, MotionOutcome, ParameterLookup, ParameterValue, Position,
    RobotIndex, ServerConfig,
};
use image::RgbImage;
use serde::Serialize;
use sim_gateway::{GatewayError, SimulatorGateway};
use tracing::{info, instrument, warn};

use crate::error::{ControlError, Result};
use crate::fleet::Fleet;
use crate::robot::{RobotSummary, RobotTemplate};
use crate::sensing::LidarSettings;

/// Session settings, derived from [`ServerConfig`]
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Scene loaded right after connecting
    pub default_scene: String,
    pub scenes_dir: String,
    pub models_dir: String,
    pub template: RobotTemplate,
    /// Bound applied to every convergence loop unless overridden per command
    pub limit: ConvergenceLimit,
    /// Default speed of `move_by`
    pub move_speed: f64,
    pub suffix_pool_size: usize,
    pub lidar: LidarSettings,
}

impl From<&ServerConfig> for SessionSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            default_scene: config.simulator.default_scene.clone(),
            scenes_dir: config.simulator.scenes_dir.clone(),
            models_dir: config.simulator.models_dir.clone(),
            template: RobotTemplate {
                robot_script: config.simulator.robot_script.clone(),
                noise_std_dev: config.motion.noise_std_dev,
                noise_seed: config.motion.noise_seed,
            },
            limit: ConvergenceLimit::new(
                config.motion.max_polls,
                config.motion.deadline_ms.map(Duration::from_millis),
            ),
            move_speed: config.motion.move_speed,
            suffix_pool_size: config.fleet.suffix_pool_size,
            lidar: LidarSettings::from(&config.lidar),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

/// Simulator address of the open connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

pub struct Session<G> {
    gateway: G,
    fleet: Fleet,
    settings: SessionSettings,
    endpoint: Option<Endpoint>,
}

impl<G: SimulatorGateway + Sync> Session<G> {
    pub fn new(gateway: G, settings: SessionSettings) -> Self {
        let fleet = Fleet::new(settings.suffix_pool_size);
        Self {
            gateway,
            fleet,
            settings,
            endpoint: None,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Convergence bound, optionally with a per-command poll budget
    pub fn limit(&self, max_polls: Option<u64>) -> ConvergenceLimit {
        let mut limit = self.settings.limit;
        if let Some(max_polls) = max_polls {
            limit.max_polls = max_polls;
        }
        limit
    }

    /// (Re)connect, load the default scene and announce the connection in
    /// the simulator status bar
    #[instrument(name = "session_connect", skip(self))]
    pub async fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        if self.endpoint.take().is_some() {
            if let Err(e) = self.gateway.disconnect().await {
                warn!(error = %e, "closing previous connection failed");
            }
        }
        self.fleet.clear();

        self.gateway
            .connect(host, port)
            .await
            .map_err(|e| match e {
                GatewayError::ConnectionFailed { message, .. } => {
                    ControlError::SimulatorUnreachable {
                        host: host.to_string(),
                        port,
                        message,
                    }
                }
                other => other.into(),
            })?;
        self.endpoint = Some(Endpoint {
            host: host.to_string(),
            port,
        });
        info!("connected to simulator");

        let scene = self.settings.default_scene.clone();
        self.load_scene(&scene).await?;

        let message = format!(
            "{}: connected",
            chrono::Local::now().time().format("%H:%M:%S%.6f")
        );
        self.print_message(&message).await
    }

    #[instrument(name = "session_disconnect", skip(self))]
    pub async fn disconnect(&mut self) -> Result<()> {
        self.fleet.clear();
        self.endpoint = None;
        self.gateway.disconnect().await?;
        info!("disconnected from simulator");
        Ok(())
    }

    pub async fn start_simulation(&self) -> Result<()> {
        self.gateway.start_simulation().await?;
        info!("simulation started");
        Ok(())
    }

    pub async fn pause_simulation(&self) -> Result<()> {
        self.gateway.pause_simulation().await?;
        info!("simulation paused");
        Ok(())
    }

    pub async fn stop_simulation(&self) -> Result<()> {
        self.gateway.stop_simulation().await?;
        info!("simulation stopped");
        Ok(())
    }

    pub async fn print_message(&self, text: &str) -> Result<()> {
        Ok(self.gateway.add_status_message(text).await?)
    }

    /// Replace the scene with `scenes_dir + scene`. Drops the fleet.
    #[instrument(name = "session_load_scene", skip(self))]
    pub async fn load_scene(&mut self, scene: &str) -> Result<()> {
        let path = join(&self.settings.scenes_dir, scene);
        self.gateway.load_scene(&path).await?;
        self.fleet.clear();
        info!(path = %path, "scene loaded");
        Ok(())
    }

    /// Load `models_dir + model` and register it as the next robot
    #[instrument(name = "session_add_robot", skip(self))]
    pub async fn add_robot(&mut self, model: &str) -> Result<RobotSummary> {
        let path = join(&self.settings.models_dir, model);
        let index = self
            .fleet
            .add_robot(&self.gateway, &path, &self.settings.template)
            .await?;
        Ok(self.fleet.robot(index)?.summary())
    }

    pub fn robots(&self) -> Vec<RobotSummary> {
        self.fleet.summaries()
    }

    pub async fn drive(&self, index: RobotIndex, drive: Drive, speed: f64) -> Result<()> {
        self.fleet.robot(index)?.drive(&self.gateway, drive, speed).await
    }

    pub async fn replace(&self, index: RobotIndex, position: Position) -> Result<()> {
        self.fleet
            .robot(index)?
            .replace(&self.gateway, position)
            .await
    }

    pub async fn turn_angle(
        &mut self,
        index: RobotIndex,
        angle: f64,
        speed: f64,
        max_polls: Option<u64>,
    ) -> Result<MotionOutcome> {
        let limit = self.limit(max_polls);
        self.fleet
            .robot_mut(index)?
            .turn_angle(&self.gateway, angle, speed, limit)
            .await
    }

    pub async fn move_distance(
        &mut self,
        index: RobotIndex,
        distance: f64,
        speed: f64,
        max_polls: Option<u64>,
    ) -> Result<MotionOutcome> {
        let limit = self.limit(max_polls);
        self.fleet
            .robot_mut(index)?
            .move_distance(&self.gateway, distance, speed, limit)
            .await
    }

    /// Noise-free forward move; `speed` defaults to the configured move speed
    pub async fn move_by(
        &self,
        index: RobotIndex,
        delta: f64,
        speed: Option<f64>,
        max_polls: Option<u64>,
    ) -> Result<MotionOutcome> {
        let speed = speed.unwrap_or(self.settings.move_speed);
        let limit = self.limit(max_polls);
        self.fleet
            .robot(index)?
            .move_by(&self.gateway, delta, speed, limit)
            .await
    }

    pub async fn capture_image(&self, index: RobotIndex) -> Result<RgbImage> {
        self.fleet.robot(index)?.capture_image(&self.gateway).await
    }

    pub async fn capture_depth(&self, index: RobotIndex) -> Result<Vec<Vec<f32>>> {
        self.fleet.robot(index)?.capture_depth(&self.gateway).await
    }

    pub async fn lidar_scan(&self, index: RobotIndex) -> Result<Vec<f32>> {
        self.fleet
            .robot(index)?
            .lidar_scan(&self.gateway, &self.settings.lidar)
            .await
    }

    pub async fn set_parameter(
        &self,
        index: RobotIndex,
        sensor: &str,
        parameter: &str,
        value: f64,
    ) -> Result<ParameterLookup<()>> {
        self.fleet
            .robot(index)?
            .set_parameter(&self.gateway, sensor, parameter, value)
            .await
    }

    pub async fn get_parameter(
        &self,
        index: RobotIndex,
        sensor: &str,
        parameter: &str,
    ) -> Result<ParameterLookup<ParameterValue>> {
        self.fleet
            .robot(index)?
            .get_parameter(&self.gateway, sensor, parameter)
            .await
    }

    pub fn list_parameters(&self, index: RobotIndex) -> Result<Vec<&'static str>> {
        Ok(self.fleet.robot(index)?.list_parameters())
    }

    pub fn standard_deviation(&self, index: RobotIndex) -> Result<f64> {
        Ok(self.fleet.robot(index)?.standard_deviation())
    }

    pub fn set_standard_deviation(&mut self, index: RobotIndex, std_dev: f64) -> Result<()> {
        self.fleet.robot_mut(index)?.set_standard_deviation(std_dev)
    }
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() || dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_gateway::{GatewayCall, MockConfig, MockGateway};

    async fn connected_session() -> Session<MockGateway> {
        let mut session = Session::new(MockGateway::new(), SessionSettings::default());
        session.connect("127.0.0.1", 19997).await.unwrap();
        session
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join("Scenes/", "Simple.ttt"), "Scenes/Simple.ttt");
        assert_eq!(join("Scenes", "Simple.ttt"), "Scenes/Simple.ttt");
        assert_eq!(join("", "Simple.ttt"), "Simple.ttt");
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = ServerConfig::default();
        config.motion.deadline_ms = None;
        config.motion.max_polls = 7;
        config.simulator.robot_script = "bot".to_string();

        let settings = SessionSettings::from(&config);
        assert_eq!(settings.limit, ConvergenceLimit::polls(7));
        assert_eq!(settings.template.robot_script, "bot");
        assert_eq!(settings.lidar.settle, Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_connect_loads_default_scene_and_announces() {
        let session = connected_session().await;
        let gateway = session.gateway();

        assert!(gateway.is_connected());
        assert_eq!(gateway.scene().as_deref(), Some("Scenes/Simple.ttt"));
        let messages = gateway.status_messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].ends_with(": connected"));
        assert_eq!(
            session.endpoint(),
            Some(&Endpoint {
                host: "127.0.0.1".to_string(),
                port: 19997
            })
        );
    }

    #[tokio::test]
    async fn test_connect_failure_is_unreachable() {
        let gateway = MockGateway::with_config(MockConfig {
            fail_connect: true,
            ..Default::default()
        });
        let mut session = Session::new(gateway, SessionSettings::default());

        let err = session.connect("10.0.0.9", 19997).await.unwrap_err();
        assert!(matches!(
            err,
            ControlError::SimulatorUnreachable { port: 19997, .. }
        ));
        assert!(err.is_unreachable());
        assert!(session.endpoint().is_none());
    }

    #[tokio::test]
    async fn test_reconnect_closes_previous_and_clears_fleet() {
        let mut session = connected_session().await;
        session.add_robot("youBot.ttm").await.unwrap();

        session.connect("127.0.0.1", 19998).await.unwrap();

        assert!(session.robots().is_empty());
        let calls = session.gateway().calls();
        let disconnect = calls.iter().position(|c| *c == GatewayCall::Disconnect);
        let reconnect = calls.iter().rposition(|c| {
            matches!(c, GatewayCall::Connect { port: 19998, .. })
        });
        assert!(disconnect.unwrap() < reconnect.unwrap());
    }

    #[tokio::test]
    async fn test_add_robot_prefixes_models_dir() {
        let mut session = connected_session().await;

        let first = session.add_robot("youBot.ttm").await.unwrap();
        let second = session.add_robot("youBot.ttm").await.unwrap();

        assert_eq!(first.index, 0);
        assert_eq!(second.suffix.as_str(), "#0");
        assert_eq!(
            session.gateway().loaded_models(),
            vec!["Models/youBot.ttm", "Models/youBot.ttm"]
        );
    }

    #[tokio::test]
    async fn test_load_scene_clears_fleet() {
        let mut session = connected_session().await;
        session.add_robot("youBot.ttm").await.unwrap();

        session.load_scene("Other.ttt").await.unwrap();

        assert!(session.robots().is_empty());
        assert!(matches!(
            session.drive(0, Drive::Forward, 1.0).await,
            Err(ControlError::RobotNotFound { .. })
        ));
        // First suffix is free again
        let robot = session.add_robot("youBot.ttm").await.unwrap();
        assert!(robot.suffix.is_primary());
    }

    #[tokio::test]
    async fn test_per_command_poll_budget() {
        let mut session = connected_session().await;
        session.add_robot("youBot.ttm").await.unwrap();

        let outcome = session.move_distance(0, 1.0, 0.0, Some(3)).await.unwrap();
        assert!(!outcome.is_converged());
        assert_eq!(outcome.polls(), 3);
    }

    #[tokio::test]
    async fn test_move_by_default_speed() {
        let mut session = connected_session().await;
        session.add_robot("youBot.ttm").await.unwrap();
        session.gateway().clear_calls();

        let outcome = session.move_by(0, 0.1, None, None).await.unwrap();
        assert!(outcome.is_converged());
        assert!(session
            .gateway()
            .calls()
            .contains(&GatewayCall::SetJointVelocity(
                session.gateway().handle_of("rollingJoint_rr").unwrap(),
                -0.5
            )));
    }

    #[tokio::test]
    async fn test_simulation_control() {
        let session = connected_session().await;

        session.start_simulation().await.unwrap();
        session.pause_simulation().await.unwrap();
        assert_eq!(
            session.gateway().simulation_state(),
            sim_gateway::SimulationState::Paused
        );
        session.stop_simulation().await.unwrap();
        assert_eq!(
            session.gateway().simulation_state(),
            sim_gateway::SimulationState::Stopped
        );
    }

    #[tokio::test]
    async fn test_disconnect_clears_everything() {
        let mut session = connected_session().await;
        session.add_robot("youBot.ttm").await.unwrap();

        session.disconnect().await.unwrap();

        assert!(session.robots().is_empty());
        assert!(session.endpoint().is_none());
        assert!(!session.gateway().is_connected());
        assert!(session.start_simulation().await.unwrap_err().is_unreachable());
    }
}
