//! # Simulator Gateway
//!
//! Handle-based remote API boundary to the physics simulator.
//!
//! Responsibilities:
//! - Define the `SimulatorGateway` trait consumed by the control layer
//! - Provide `MockGateway`, an in-process kinematic double that records
//!   every call and supports failure injection

pub mod error;
pub mod gateway;
pub mod mock_gateway;

pub use contracts::{ObjectHandle, ParamId, Position, ScriptCall, ScriptReply, SignalMode};
pub use error::{GatewayError, Result};
pub use gateway::{LocalSimulatorGateway, SimulatorGateway};
pub use mock_gateway::{GatewayCall, MockConfig, MockGateway, SimulationState};
