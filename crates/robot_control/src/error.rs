//! Robot control error types

use contracts::{Part, RobotIndex};
use sim_gateway::GatewayError;
use thiserror::Error;

/// Robot control error
#[derive(Debug, Error)]
pub enum ControlError {
    /// A part of a freshly loaded robot could not be resolved
    #[error("failed to resolve {part} ('{name}'): {message}")]
    HandleResolution {
        part: Part,
        name: String,
        message: String,
    },

    /// Every instance suffix is held
    #[error("suffix pool exhausted ({capacity} robots max)")]
    SuffixPoolExhausted { capacity: usize },

    /// No robot at this index
    #[error("robot {index} not found (fleet has {fleet_size} robots)")]
    RobotNotFound {
        index: RobotIndex,
        fleet_size: usize,
    },

    /// Sensor name is neither a logical nor a native vision sensor name
    #[error("sensor '{sensor}' not found")]
    SensorNotFound { sensor: String },

    #[error("invalid standard deviation {value}: must be finite and >= 0")]
    InvalidStandardDeviation { value: f64 },

    /// Connection to the simulator could not be opened
    #[error("simulator unreachable at {host}:{port}: {message}")]
    SimulatorUnreachable {
        host: String,
        port: u16,
        message: String,
    },

    /// Depth buffer does not have the expected dimensions
    #[error("depth buffer has {actual} values, expected {expected}")]
    DepthShape { expected: usize, actual: usize },

    /// RGB raster length does not match its declared size
    #[error("image raster {width}x{height} has {actual} bytes, expected {expected}")]
    ImageShape {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// LIDAR signal stayed empty
    #[error("no lidar data on '{signal}' after {polls} reads")]
    LidarUnavailable { signal: String, polls: u64 },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ControlError {
    pub fn handle_resolution(part: Part, name: impl Into<String>, source: &GatewayError) -> Self {
        Self::HandleResolution {
            part,
            name: name.into(),
            message: source.to_string(),
        }
    }

    /// True when the simulator cannot be reached at all
    pub fn is_unreachable(&self) -> bool {
        match self {
            ControlError::SimulatorUnreachable { .. } => true,
            ControlError::Gateway(e) => e.is_unreachable(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ControlError>;
