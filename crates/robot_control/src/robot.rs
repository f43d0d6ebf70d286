//! Robot aggregate: handles, motion, noise and sensors of one instance

use contracts::{
    ConvergenceLimit, Drive, InstanceSuffix, MotionOutcome, ObjectHandle, ParameterLookup,
    ParameterValue, Part, Position, RobotIndex,
};
use image::RgbImage;
use serde::Serialize;
use sim_gateway::SimulatorGateway;
use tracing::{info, instrument};

use crate::error::{ControlError, Result};
use crate::handles::RobotHandles;
use crate::motion::MotionController;
use crate::noise::MeasurementNoise;
use crate::sensing::{self, LidarSettings};
use crate::sensor_params::{SensorParameter, SensorParameterStore};

/// Settings shared by every robot of a session
#[derive(Debug, Clone)]
pub struct RobotTemplate {
    /// Base name of the scene script answering heading and turn calls
    pub robot_script: String,
    pub noise_std_dev: f64,
    /// Robot `i` seeds its noise with `seed + i`
    pub noise_seed: Option<u64>,
}

impl Default for RobotTemplate {
    fn default() -> Self {
        Self {
            robot_script: "youBot_ref".to_string(),
            noise_std_dev: 0.01,
            noise_seed: None,
        }
    }
}

/// Public view of one robot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotSummary {
    pub index: RobotIndex,
    pub suffix: InstanceSuffix,
    pub standard_deviation: f64,
}

/// One robot instance in the scene
#[derive(Debug)]
pub struct Robot {
    index: RobotIndex,
    suffix: InstanceSuffix,
    handles: RobotHandles,
    motion: MotionController,
    noise: MeasurementNoise,
}

impl Robot {
    /// Resolve every part of an already loaded model copy
    #[instrument(name = "robot_spawn", skip(gateway, template, suffix), fields(suffix = %suffix))]
    pub async fn spawn<G: SimulatorGateway + Sync>(
        gateway: &G,
        index: RobotIndex,
        suffix: InstanceSuffix,
        template: &RobotTemplate,
    ) -> Result<Self> {
        let handles = RobotHandles::resolve(gateway, suffix).await?;
        let seed = template
            .noise_seed
            .map(|seed| seed.wrapping_add(index as u64));
        let noise = MeasurementNoise::new(template.noise_std_dev, seed)?;
        let motion = MotionController::new(&handles, suffix.apply(&template.robot_script));

        info!(index, script = %motion.script(), "robot ready");
        Ok(Self {
            index,
            suffix,
            handles,
            motion,
            noise,
        })
    }

    pub fn index(&self) -> RobotIndex {
        self.index
    }

    pub fn suffix(&self) -> InstanceSuffix {
        self.suffix
    }

    pub fn handles(&self) -> &RobotHandles {
        &self.handles
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn summary(&self) -> RobotSummary {
        RobotSummary {
            index: self.index,
            suffix: self.suffix,
            standard_deviation: self.noise.std_dev(),
        }
    }

    pub fn standard_deviation(&self) -> f64 {
        self.noise.std_dev()
    }

    pub fn set_standard_deviation(&mut self, std_dev: f64) -> Result<()> {
        self.noise.set_std_dev(std_dev)?;
        info!(index = self.index, std_dev, "standard deviation updated");
        Ok(())
    }

    pub async fn drive<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        drive: Drive,
        speed: f64,
    ) -> Result<()> {
        self.motion.drive(gateway, drive, speed).await
    }

    pub async fn stop<G: SimulatorGateway + Sync>(&self, gateway: &G) -> Result<()> {
        self.motion.stop(gateway).await
    }

    pub async fn position<G: SimulatorGateway + Sync>(&self, gateway: &G) -> Result<Position> {
        self.motion.position(gateway).await
    }

    /// Teleport the robot body
    #[instrument(name = "robot_replace", skip(self, gateway), fields(index = self.index))]
    pub async fn replace<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        position: Position,
    ) -> Result<()> {
        gateway
            .set_position(self.handles.get(Part::Body), position)
            .await?;
        Ok(())
    }

    pub async fn move_distance<G: SimulatorGateway + Sync>(
        &mut self,
        gateway: &G,
        distance: f64,
        speed: f64,
        limit: ConvergenceLimit,
    ) -> Result<MotionOutcome> {
        self.motion
            .move_distance(gateway, &mut self.noise, distance, speed, limit)
            .await
    }

    pub async fn move_by<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        delta: f64,
        speed: f64,
        limit: ConvergenceLimit,
    ) -> Result<MotionOutcome> {
        self.motion.move_by(gateway, delta, speed, limit).await
    }

    pub async fn turn_angle<G: SimulatorGateway + Sync>(
        &mut self,
        gateway: &G,
        angle: f64,
        speed: f64,
        limit: ConvergenceLimit,
    ) -> Result<MotionOutcome> {
        self.motion
            .turn_angle(gateway, &mut self.noise, angle, speed, limit)
            .await
    }

    /// Vision sensor by logical (`camera-rgb`) or scene (`kinect_rgb`) name
    pub fn sensor_handle(&self, sensor: &str) -> Result<ObjectHandle> {
        match Part::lookup(sensor) {
            Some(part @ (Part::CameraRgb | Part::CameraDepth)) => Ok(self.handles.get(part)),
            _ => Err(ControlError::SensorNotFound {
                sensor: sensor.to_string(),
            }),
        }
    }

    /// Unknown parameter names are answered with `NotFound` before any RPC
    pub async fn set_parameter<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        sensor: &str,
        parameter: &str,
        value: f64,
    ) -> Result<ParameterLookup<()>> {
        let Some(param) = SensorParameter::lookup(parameter) else {
            return Ok(ParameterLookup::NotFound);
        };
        let handle = self.sensor_handle(sensor)?;
        SensorParameterStore::write(gateway, handle, param, value).await?;
        Ok(ParameterLookup::Found(()))
    }

    pub async fn get_parameter<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        sensor: &str,
        parameter: &str,
    ) -> Result<ParameterLookup<ParameterValue>> {
        let Some(param) = SensorParameter::lookup(parameter) else {
            return Ok(ParameterLookup::NotFound);
        };
        let handle = self.sensor_handle(sensor)?;
        let value = SensorParameterStore::read(gateway, handle, param).await?;
        Ok(ParameterLookup::Found(value))
    }

    pub fn list_parameters(&self) -> Vec<&'static str> {
        SensorParameterStore::list_parameters()
    }

    pub async fn capture_image<G: SimulatorGateway + Sync>(&self, gateway: &G) -> Result<RgbImage> {
        sensing::capture_image(gateway, self.handles.get(Part::CameraRgb)).await
    }

    pub async fn capture_depth<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
    ) -> Result<Vec<Vec<f32>>> {
        sensing::capture_depth(gateway, self.handles.get(Part::CameraDepth)).await
    }

    pub async fn lidar_scan<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        settings: &LidarSettings,
    ) -> Result<Vec<f32>> {
        sensing::lidar_scan(gateway, settings).await
    }
}
