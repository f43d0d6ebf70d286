//! Logical robot parts and their scene object names

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical part of one robot instance.
///
/// Every part maps to a fixed base object name in the robot model; the
/// instance suffix is appended to that base name at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Part {
    WheelRearRight,
    WheelRearLeft,
    WheelFrontRight,
    WheelFrontLeft,
    Floor,
    PositionTarget,
    OrientationBase,
    CameraRgb,
    CameraDepth,
    Body,
    PlatformSub,
}

impl Part {
    pub const COUNT: usize = 11;

    /// Resolution order
    pub const ALL: [Part; Part::COUNT] = [
        Part::WheelRearRight,
        Part::WheelRearLeft,
        Part::WheelFrontRight,
        Part::WheelFrontLeft,
        Part::Floor,
        Part::PositionTarget,
        Part::OrientationBase,
        Part::CameraRgb,
        Part::CameraDepth,
        Part::Body,
        Part::PlatformSub,
    ];

    /// Wheel joints in command order: RR, RL, FR, FL
    pub const WHEELS: [Part; 4] = [
        Part::WheelRearRight,
        Part::WheelRearLeft,
        Part::WheelFrontRight,
        Part::WheelFrontLeft,
    ];

    /// Kebab-case logical name
    pub fn name(self) -> &'static str {
        match self {
            Part::WheelRearRight => "wheel-rear-right",
            Part::WheelRearLeft => "wheel-rear-left",
            Part::WheelFrontRight => "wheel-front-right",
            Part::WheelFrontLeft => "wheel-front-left",
            Part::Floor => "floor",
            Part::PositionTarget => "position-target",
            Part::OrientationBase => "orientation-base",
            Part::CameraRgb => "camera-rgb",
            Part::CameraDepth => "camera-depth",
            Part::Body => "body",
            Part::PlatformSub => "platform-sub",
        }
    }

    /// Unsuffixed object name inside the robot model
    pub fn object_name(self) -> &'static str {
        match self {
            Part::WheelRearRight => "rollingJoint_rr",
            Part::WheelRearLeft => "rollingJoint_rl",
            Part::WheelFrontRight => "rollingJoint_fr",
            Part::WheelFrontLeft => "rollingJoint_fl",
            Part::Floor => "ResizableFloor",
            Part::PositionTarget => "youBot_positionTarget",
            Part::OrientationBase => "youBot_orientationBase",
            Part::CameraRgb => "kinect_rgb",
            Part::CameraDepth => "kinect_depth",
            Part::Body => "youBot",
            Part::PlatformSub => "ME_Platfo2_sub1",
        }
    }

    /// Dense index into `Part::ALL`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look a part up by logical name or model object name
    pub fn lookup(name: &str) -> Option<Part> {
        Part::ALL
            .into_iter()
            .find(|part| part.name() == name || part.object_name() == name)
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Part {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Part::lookup(s).ok_or_else(|| format!("unknown part '{s}'"))
    }
}
