//! Command handlers
//!
//! Each handler validates its arguments, takes the session lock and runs
//! exactly one session operation. Query names keep the kebab-case of the
//! historical command set (`robot-id`, `sensor-name`, ...).

use std::io::Cursor;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::{Drive, MotionOutcome, ParameterLookup, Position, RobotIndex};
use image::codecs::gif::GifEncoder;
use image::{DynamicImage, Frame, RgbImage};
use robot_control::RobotSummary;
use serde::Deserialize;
use sim_gateway::SimulatorGateway;
use tracing::{info, instrument};

use crate::error::{DispatchError, Result};
use crate::router::AppState;

const OK: &str = "OK";
const CONNECTED: &str = "Successfully connected to V-REP server";

/// Query extractor whose rejection becomes a 400 [`DispatchError`]
type Args<T> = std::result::Result<Query<T>, QueryRejection>;
type PathArgs<T> = std::result::Result<Path<T>, PathRejection>;

#[derive(Debug, Deserialize)]
pub struct ConnectArgs {
    pub ip: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct TextArgs {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SceneArgs {
    pub scene: String,
}

#[derive(Debug, Deserialize)]
pub struct ModelArgs {
    pub model: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RobotArgs {
    pub robot_id: RobotIndex,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DriveArgs {
    pub robot_id: RobotIndex,
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReplaceArgs {
    pub robot_id: RobotIndex,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TurnArgs {
    pub robot_id: RobotIndex,
    pub angle: f64,
    pub speed: f64,
    pub max_polls: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DistanceArgs {
    pub robot_id: RobotIndex,
    pub distance: f64,
    pub speed: f64,
    pub max_polls: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MoveArgs {
    pub robot_id: RobotIndex,
    pub delta: f64,
    pub speed: Option<f64>,
    pub max_polls: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SensorParamArgs {
    pub robot_id: RobotIndex,
    pub sensor_name: String,
    pub parameter_name: String,
    pub parameter_value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StdDevArgs {
    pub robot_id: RobotIndex,
    pub standard_deviation: f64,
}

fn finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DispatchError::invalid_argument(name, "must be a finite number"))
    }
}

/// Converged motions answer with the outcome, bounded ones with 504
fn motion_reply(outcome: MotionOutcome) -> Result<Json<MotionOutcome>> {
    if outcome.is_converged() {
        Ok(Json(outcome))
    } else {
        Err(DispatchError::TimedOut(outcome))
    }
}

// ========== Connection and simulation ==========

#[instrument(name = "http_connect", skip_all)]
pub async fn connect<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<ConnectArgs>,
) -> Result<&'static str> {
    let Query(args) = args?;
    let mut session = state.session.lock().await;
    session.connect(&args.ip, args.port).await?;
    info!(host = %args.ip, port = args.port, "simulator connected");
    Ok(CONNECTED)
}

pub async fn start_simulation<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
) -> Result<&'static str> {
    state.session.lock().await.start_simulation().await?;
    Ok(OK)
}

pub async fn pause_simulation<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
) -> Result<&'static str> {
    state.session.lock().await.pause_simulation().await?;
    Ok(OK)
}

pub async fn stop_simulation<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
) -> Result<&'static str> {
    state.session.lock().await.stop_simulation().await?;
    Ok(OK)
}

pub async fn print_message<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<TextArgs>,
) -> Result<&'static str> {
    let Query(args) = args?;
    state.session.lock().await.print_message(&args.text).await?;
    Ok(OK)
}

// ========== Scene and fleet ==========

pub async fn load_scene<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<SceneArgs>,
) -> Result<&'static str> {
    let Query(args) = args?;
    state.session.lock().await.load_scene(&args.scene).await?;
    Ok(OK)
}

pub async fn add_robot<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<ModelArgs>,
) -> Result<Json<RobotSummary>> {
    let Query(args) = args?;
    let summary = state.session.lock().await.add_robot(&args.model).await?;
    Ok(Json(summary))
}

pub async fn robots<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
) -> Json<Vec<RobotSummary>> {
    Json(state.session.lock().await.robots())
}

// ========== Open-loop motion ==========

async fn drive<G: SimulatorGateway + Send + Sync>(
    state: AppState<G>,
    args: Args<DriveArgs>,
    drive: Drive,
) -> Result<&'static str> {
    let Query(args) = args?;
    let speed = finite("speed", args.speed)?;
    state
        .session
        .lock()
        .await
        .drive(args.robot_id, drive, speed)
        .await?;
    Ok(OK)
}

pub async fn forward<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<DriveArgs>,
) -> Result<&'static str> {
    drive(state, args, Drive::Forward).await
}

pub async fn backward<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<DriveArgs>,
) -> Result<&'static str> {
    drive(state, args, Drive::Backward).await
}

pub async fn left<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<DriveArgs>,
) -> Result<&'static str> {
    drive(state, args, Drive::StrafeLeft).await
}

pub async fn right<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<DriveArgs>,
) -> Result<&'static str> {
    drive(state, args, Drive::StrafeRight).await
}

pub async fn stop<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<RobotArgs>,
) -> Result<&'static str> {
    let Query(args) = args?;
    state
        .session
        .lock()
        .await
        .drive(args.robot_id, Drive::Stop, 0.0)
        .await?;
    Ok(OK)
}

pub async fn replace<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<ReplaceArgs>,
) -> Result<&'static str> {
    let Query(args) = args?;
    let position = Position::new(
        finite("x", args.x)?,
        finite("y", args.y)?,
        finite("z", args.z)?,
    );
    state
        .session
        .lock()
        .await
        .replace(args.robot_id, position)
        .await?;
    Ok(OK)
}

// ========== Closed-loop motion ==========

#[instrument(name = "http_turn_angle", skip_all)]
pub async fn turn_angle<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<TurnArgs>,
) -> Result<Json<MotionOutcome>> {
    let Query(args) = args?;
    let angle = finite("angle", args.angle)?;
    let speed = finite("speed", args.speed)?;
    let outcome = state
        .session
        .lock()
        .await
        .turn_angle(args.robot_id, angle, speed, args.max_polls)
        .await?;
    motion_reply(outcome)
}

#[instrument(name = "http_move_distance", skip_all)]
pub async fn move_distance<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<DistanceArgs>,
) -> Result<Json<MotionOutcome>> {
    let Query(args) = args?;
    let distance = finite("distance", args.distance)?;
    let speed = finite("speed", args.speed)?;
    let outcome = state
        .session
        .lock()
        .await
        .move_distance(args.robot_id, distance, speed, args.max_polls)
        .await?;
    motion_reply(outcome)
}

#[instrument(name = "http_move", skip_all)]
pub async fn move_by<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<MoveArgs>,
) -> Result<Json<MotionOutcome>> {
    let Query(args) = args?;
    let delta = finite("delta", args.delta)?;
    let speed = args.speed.map(|s| finite("speed", s)).transpose()?;
    let outcome = state
        .session
        .lock()
        .await
        .move_by(args.robot_id, delta, speed, args.max_polls)
        .await?;
    motion_reply(outcome)
}

// ========== Sensing ==========

pub async fn get_image<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    robot: PathArgs<RobotIndex>,
) -> Result<Response> {
    let Path(robot) = robot?;
    let image = state.session.lock().await.capture_image(robot).await?;
    let gif = encode_gif(image)?;
    Ok(([(header::CONTENT_TYPE, "image/gif")], gif).into_response())
}

/// Single-frame GIF of an RGB raster
fn encode_gif(image: RgbImage) -> Result<Vec<u8>> {
    let rgba = DynamicImage::ImageRgb8(image).into_rgba8();
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = GifEncoder::new_with_speed(&mut buf, 10);
        encoder.encode_frame(Frame::new(rgba))?;
    }
    Ok(buf.into_inner())
}

pub async fn get_depth<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    robot: PathArgs<RobotIndex>,
) -> Result<Json<Vec<Vec<f32>>>> {
    let Path(robot) = robot?;
    let depth = state.session.lock().await.capture_depth(robot).await?;
    Ok(Json(depth))
}

pub async fn get_lidar<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    robot: PathArgs<RobotIndex>,
) -> Result<Json<Vec<f32>>> {
    let Path(robot) = robot?;
    let ranges = state.session.lock().await.lidar_scan(robot).await?;
    Ok(Json(ranges))
}

// ========== Sensor parameters and noise ==========

pub async fn set_sensor_params<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<SensorParamArgs>,
) -> Result<&'static str> {
    let Query(args) = args?;
    let value = finite("parameter-value", args.parameter_value)?;
    let lookup = state
        .session
        .lock()
        .await
        .set_parameter(args.robot_id, &args.sensor_name, &args.parameter_name, value)
        .await?;
    match lookup {
        ParameterLookup::Found(()) => Ok(OK),
        ParameterLookup::NotFound => Err(DispatchError::ParameterNotFound {
            parameter: args.parameter_name,
        }),
    }
}

pub async fn get_sensor_params<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    path: PathArgs<(RobotIndex, String, String)>,
) -> Result<Response> {
    let Path((robot, sensor, parameter)) = path?;
    let lookup = state
        .session
        .lock()
        .await
        .get_parameter(robot, &sensor, &parameter)
        .await?;
    match lookup {
        ParameterLookup::Found(value) => Ok(Json(value).into_response()),
        ParameterLookup::NotFound => Err(DispatchError::ParameterNotFound { parameter }),
    }
}

pub async fn get_sensor_params_list<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    robot: PathArgs<RobotIndex>,
) -> Result<Json<Vec<&'static str>>> {
    let Path(robot) = robot?;
    let names = state.session.lock().await.list_parameters(robot)?;
    Ok(Json(names))
}

pub async fn get_standard_deviation<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    robot: PathArgs<RobotIndex>,
) -> Result<String> {
    let Path(robot) = robot?;
    let std_dev = state.session.lock().await.standard_deviation(robot)?;
    Ok(std_dev.to_string())
}

pub async fn set_standard_deviation<G: SimulatorGateway + Send + Sync>(
    State(state): State<AppState<G>>,
    args: Args<StdDevArgs>,
) -> Result<&'static str> {
    let Query(args) = args?;
    state
        .session
        .lock()
        .await
        .set_standard_deviation(args.robot_id, args.standard_deviation)?;
    Ok(OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_rejects_nan_and_infinity() {
        assert_eq!(finite("speed", 1.5).unwrap(), 1.5);
        assert!(matches!(
            finite("speed", f64::NAN),
            Err(DispatchError::InvalidArgument { .. })
        ));
        assert!(finite("speed", f64::INFINITY).is_err());
    }

    #[test]
    fn test_encode_gif_header() {
        let image = RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
        let gif = encode_gif(image).unwrap();
        assert!(gif.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_motion_reply() {
        let converged = MotionOutcome::Converged {
            target: 1.0,
            achieved: 1.0,
            polls: 3,
        };
        assert!(motion_reply(converged).is_ok());

        let timed_out = MotionOutcome::TimedOut {
            target: 1.0,
            achieved: 0.2,
            polls: 3,
        };
        assert!(matches!(
            motion_reply(timed_out),
            Err(DispatchError::TimedOut(_))
        ));
    }
}
