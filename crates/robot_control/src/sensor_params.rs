//! Vision sensor parameter store
//!
//! A fixed table of named parameters, shared by every robot. Float-domain
//! parameters are read as floats; integer-domain parameters are read as
//! integers but, like the floats, written through the float setter.

use std::f64::consts::PI;
use std::fmt;

use contracts::{ObjectHandle, ParamId, ParameterValue};
use sim_gateway::SimulatorGateway;
use tracing::{debug, instrument};

use crate::error::Result;

/// Float signal raised after every parameter write
pub const CHANGE_SIGNAL: &str = "change_params";

/// Value domain of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterDomain {
    Float,
    Integer,
}

/// Known vision sensor parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorParameter {
    NearClippingPlane,
    FarClippingPlane,
    PerspectiveAngle,
    ResolutionX,
    ResolutionY,
}

impl SensorParameter {
    /// Float domain first, then integer domain
    pub const ALL: [SensorParameter; 5] = [
        SensorParameter::NearClippingPlane,
        SensorParameter::FarClippingPlane,
        SensorParameter::PerspectiveAngle,
        SensorParameter::ResolutionX,
        SensorParameter::ResolutionY,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SensorParameter::NearClippingPlane => "near-clipping-plane",
            SensorParameter::FarClippingPlane => "far-clipping-plane",
            SensorParameter::PerspectiveAngle => "perspective-angle",
            SensorParameter::ResolutionX => "vision-sensor-resolution-x",
            SensorParameter::ResolutionY => "vision-sensor-resolution-y",
        }
    }

    /// Simulator object parameter id
    pub fn id(self) -> ParamId {
        match self {
            SensorParameter::NearClippingPlane => 1000,
            SensorParameter::FarClippingPlane => 1001,
            SensorParameter::ResolutionX => 1002,
            SensorParameter::ResolutionY => 1003,
            SensorParameter::PerspectiveAngle => 1004,
        }
    }

    pub fn domain(self) -> ParameterDomain {
        match self {
            SensorParameter::ResolutionX | SensorParameter::ResolutionY => {
                ParameterDomain::Integer
            }
            _ => ParameterDomain::Float,
        }
    }

    /// Case-insensitive lookup, `_` accepted for `-`
    pub fn lookup(name: &str) -> Option<SensorParameter> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|p| p.name() == normalized)
    }

    /// Convert a caller value to the simulator representation.
    ///
    /// The perspective angle is exposed in degrees and stored as half the
    /// angle in radians.
    pub fn to_stored(self, value: f64) -> f64 {
        match self {
            SensorParameter::PerspectiveAngle => value * PI / 360.0,
            _ => value,
        }
    }

    /// Inverse of [`to_stored`](Self::to_stored)
    pub fn from_stored(self, value: f64) -> f64 {
        match self {
            SensorParameter::PerspectiveAngle => value * 360.0 / PI,
            _ => value,
        }
    }
}

impl fmt::Display for SensorParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameter access against a resolved vision sensor handle
pub struct SensorParameterStore;

impl SensorParameterStore {
    /// Every parameter name, float domain first
    pub fn list_parameters() -> Vec<&'static str> {
        SensorParameter::ALL.iter().map(|p| p.name()).collect()
    }

    /// Write `value` and notify the scene through [`CHANGE_SIGNAL`]
    #[instrument(name = "sensor_params_write", skip(gateway), fields(param = %param))]
    pub async fn write<G: SimulatorGateway + Sync>(
        gateway: &G,
        sensor: ObjectHandle,
        param: SensorParameter,
        value: f64,
    ) -> Result<()> {
        let stored = param.to_stored(value);
        gateway
            .set_float_parameter(sensor, param.id(), stored)
            .await?;
        gateway.set_float_signal(CHANGE_SIGNAL, value).await?;
        gateway.clear_float_signal(CHANGE_SIGNAL).await?;
        debug!(sensor, value, stored, "sensor parameter written");
        Ok(())
    }

    #[instrument(name = "sensor_params_read", skip(gateway), fields(param = %param))]
    pub async fn read<G: SimulatorGateway + Sync>(
        gateway: &G,
        sensor: ObjectHandle,
        param: SensorParameter,
    ) -> Result<ParameterValue> {
        let value = match param.domain() {
            ParameterDomain::Float => {
                let stored = gateway.get_float_parameter(sensor, param.id()).await?;
                ParameterValue::Float(param.from_stored(stored))
            }
            ParameterDomain::Integer => {
                ParameterValue::Integer(gateway.get_int_parameter(sensor, param.id()).await?)
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_gateway::{GatewayCall, MockGateway};

    async fn sensor() -> (MockGateway, ObjectHandle) {
        let mut gateway = MockGateway::new();
        gateway.connect("127.0.0.1", 19997).await.unwrap();
        gateway.load_model("Models/youBot.ttm").await.unwrap();
        let handle = gateway.handle_of("kinect_rgb").unwrap();
        gateway.clear_calls();
        (gateway, handle)
    }

    #[test]
    fn test_lookup_normalizes_names() {
        assert_eq!(
            SensorParameter::lookup("perspective_angle"),
            Some(SensorParameter::PerspectiveAngle)
        );
        assert_eq!(
            SensorParameter::lookup("Vision-Sensor-Resolution-X"),
            Some(SensorParameter::ResolutionX)
        );
        assert_eq!(SensorParameter::lookup("exposure"), None);
    }

    #[test]
    fn test_list_order() {
        assert_eq!(
            SensorParameterStore::list_parameters(),
            vec![
                "near-clipping-plane",
                "far-clipping-plane",
                "perspective-angle",
                "vision-sensor-resolution-x",
                "vision-sensor-resolution-y",
            ]
        );
    }

    #[test]
    fn test_ids_and_domains() {
        let table: Vec<_> = SensorParameter::ALL
            .iter()
            .map(|p| (p.id(), p.domain()))
            .collect();
        assert_eq!(
            table,
            vec![
                (1000, ParameterDomain::Float),
                (1001, ParameterDomain::Float),
                (1004, ParameterDomain::Float),
                (1002, ParameterDomain::Integer),
                (1003, ParameterDomain::Integer),
            ]
        );
    }

    #[tokio::test]
    async fn test_perspective_angle_written_as_half_radians() {
        let (gateway, handle) = sensor().await;

        SensorParameterStore::write(&gateway, handle, SensorParameter::PerspectiveAngle, 90.0)
            .await
            .unwrap();

        let stored = gateway.float_parameter(handle, 1004).unwrap();
        assert!((stored - PI / 4.0).abs() < 1e-12);
        assert_eq!(
            gateway.calls(),
            vec![
                GatewayCall::SetFloatParameter(handle, 1004, stored),
                GatewayCall::SetFloatSignal(CHANGE_SIGNAL.to_string(), 90.0),
                GatewayCall::ClearFloatSignal(CHANGE_SIGNAL.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_perspective_angle_read_in_degrees() {
        let (gateway, handle) = sensor().await;
        gateway.preset_float_parameter(handle, 1004, PI / 4.0);

        let value = SensorParameterStore::read(&gateway, handle, SensorParameter::PerspectiveAngle)
            .await
            .unwrap();
        assert!((value.as_f64() - 90.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_integer_domain_uses_float_setter() {
        let (gateway, handle) = sensor().await;

        SensorParameterStore::write(&gateway, handle, SensorParameter::ResolutionX, 320.0)
            .await
            .unwrap();
        let value = SensorParameterStore::read(&gateway, handle, SensorParameter::ResolutionX)
            .await
            .unwrap();

        assert_eq!(value, ParameterValue::Integer(320));
        assert!(gateway
            .calls()
            .contains(&GatewayCall::GetIntParameter(handle, 1002)));
    }
}
