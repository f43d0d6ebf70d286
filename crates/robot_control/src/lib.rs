//! # Robot Control
//!
//! Control layer for simulated four-wheel mecanum robots.
//!
//! Responsibilities:
//! - Resolve the scene handles of each robot instance (`RobotHandles`)
//! - Open- and closed-loop wheel motion (`MotionController`)
//! - Vision sensor parameters (`SensorParameterStore`)
//! - Camera, depth and LIDAR reads
//! - Multi-robot registry with instance suffixes (`Fleet`)
//! - One `Session` tying the gateway, the scene and the fleet together
//!
//! Every operation is a sequence of awaited gateway calls; nothing here
//! spawns tasks or retries.

pub mod error;
pub mod fleet;
pub mod handles;
pub mod motion;
pub mod noise;
pub mod robot;
pub mod sensing;
pub mod sensor_params;
pub mod session;

pub use error::{ControlError, Result};
pub use fleet::Fleet;
pub use handles::RobotHandles;
pub use motion::MotionController;
pub use noise::MeasurementNoise;
pub use robot::{Robot, RobotSummary, RobotTemplate};
pub use sensing::LidarSettings;
pub use sensor_params::{ParameterDomain, SensorParameter, SensorParameterStore, CHANGE_SIGNAL};
pub use session::{Endpoint, Session, SessionSettings};
