//! Motion commands, convergence bounds and outcomes

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Open-loop drive primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drive {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Stop,
}

impl Drive {
    /// Sign applied to the speed of each wheel, RR, RL, FR, FL.
    ///
    /// Four-wheel mecanum model: longitudinal motion drives every wheel with
    /// the same sign, lateral motion drives diagonal pairs with opposite signs.
    pub fn wheel_signs(self) -> [f64; 4] {
        match self {
            Drive::Forward => [-1.0, -1.0, -1.0, -1.0],
            Drive::Backward => [1.0, 1.0, 1.0, 1.0],
            Drive::StrafeRight => [1.0, -1.0, 1.0, -1.0],
            Drive::StrafeLeft => [-1.0, 1.0, -1.0, 1.0],
            Drive::Stop => [0.0; 4],
        }
    }

    /// Wheel target velocities for `speed`, RR, RL, FR, FL
    pub fn wheel_velocities(self, speed: f64) -> [f64; 4] {
        self.wheel_signs().map(|sign| sign * speed)
    }
}

/// Closed-loop primitive, used as a metrics/log label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    MoveDistance,
    MoveBy,
    TurnAngle,
}

impl MotionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MotionKind::MoveDistance => "move_distance",
            MotionKind::MoveBy => "move_by",
            MotionKind::TurnAngle => "turn_angle",
        }
    }
}

impl fmt::Display for MotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bound on one convergence loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceLimit {
    /// Maximum number of state polls
    pub max_polls: u64,
    /// Maximum wall-clock time
    pub deadline: Option<Duration>,
}

impl ConvergenceLimit {
    pub fn new(max_polls: u64, deadline: Option<Duration>) -> Self {
        Self {
            max_polls,
            deadline,
        }
    }

    /// Bound by poll count only
    pub fn polls(max_polls: u64) -> Self {
        Self::new(max_polls, None)
    }

    /// True once `polls` or the elapsed time since `started` hit the bound
    pub fn exceeded(&self, polls: u64, started: Instant) -> bool {
        polls >= self.max_polls || self.deadline.is_some_and(|d| started.elapsed() >= d)
    }
}

impl Default for ConvergenceLimit {
    fn default() -> Self {
        Self::new(100_000, Some(Duration::from_secs(60)))
    }
}

/// Result of a convergence loop. The motion is stopped in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MotionOutcome {
    /// Target reached
    Converged {
        /// Target actually pursued (after noise)
        target: f64,
        /// Distance or angle covered
        achieved: f64,
        polls: u64,
    },
    /// Bound hit before the target was reached
    TimedOut {
        target: f64,
        achieved: f64,
        polls: u64,
    },
}

impl MotionOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, MotionOutcome::Converged { .. })
    }

    pub fn polls(&self) -> u64 {
        match *self {
            MotionOutcome::Converged { polls, .. } | MotionOutcome::TimedOut { polls, .. } => {
                polls
            }
        }
    }

    pub fn achieved(&self) -> f64 {
        match *self {
            MotionOutcome::Converged { achieved, .. }
            | MotionOutcome::TimedOut { achieved, .. } => achieved,
        }
    }

    pub fn target(&self) -> f64 {
        match *self {
            MotionOutcome::Converged { target, .. } | MotionOutcome::TimedOut { target, .. } => {
                target
            }
        }
    }
}
