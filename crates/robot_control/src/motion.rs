//! Wheel-level motion control
//!
//! Open-loop primitives set the four wheel joint velocities. Closed-loop
//! primitives poll the simulator until a distance or angle is covered,
//! bounded by a [`ConvergenceLimit`], and always leave the robot stopped.

use std::time::Instant;

use contracts::{
    script_fn, ConvergenceLimit, Drive, MotionKind, MotionOutcome, ObjectHandle, Part, Position,
    ScriptCall,
};
use sim_gateway::{GatewayError, SimulatorGateway};
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::handles::RobotHandles;
use crate::noise::MeasurementNoise;

/// State of a convergence loop when it exits
#[derive(Debug, Clone, Copy)]
struct Progress {
    achieved: f64,
    polls: u64,
    converged: bool,
}

/// Motion controller of one robot
#[derive(Debug, Clone)]
pub struct MotionController {
    wheels: [ObjectHandle; 4],
    position_target: ObjectHandle,
    script: String,
}

impl MotionController {
    /// `script` is the scene script object answering `GetRobotAngle`/`Turn`
    pub fn new(handles: &RobotHandles, script: impl Into<String>) -> Self {
        Self {
            wheels: handles.wheels(),
            position_target: handles.get(Part::PositionTarget),
            script: script.into(),
        }
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    /// Set the four wheel velocities for `drive` at `speed`, RR, RL, FR, FL
    #[instrument(name = "motion_drive", skip(self, gateway), fields(script = %self.script))]
    pub async fn drive<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        drive: Drive,
        speed: f64,
    ) -> Result<()> {
        for (wheel, velocity) in self.wheels.iter().zip(drive.wheel_velocities(speed)) {
            gateway.set_joint_velocity(*wheel, velocity).await?;
        }
        Ok(())
    }

    pub async fn forward<G: SimulatorGateway + Sync>(&self, gateway: &G, speed: f64) -> Result<()> {
        self.drive(gateway, Drive::Forward, speed).await
    }

    pub async fn backward<G: SimulatorGateway + Sync>(&self, gateway: &G, speed: f64) -> Result<()> {
        self.drive(gateway, Drive::Backward, speed).await
    }

    pub async fn strafe_left<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        speed: f64,
    ) -> Result<()> {
        self.drive(gateway, Drive::StrafeLeft, speed).await
    }

    pub async fn strafe_right<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        speed: f64,
    ) -> Result<()> {
        self.drive(gateway, Drive::StrafeRight, speed).await
    }

    pub async fn stop<G: SimulatorGateway + Sync>(&self, gateway: &G) -> Result<()> {
        self.drive(gateway, Drive::Stop, 0.0).await
    }

    /// Current position of the robot's position target
    pub async fn position<G: SimulatorGateway + Sync>(&self, gateway: &G) -> Result<Position> {
        Ok(gateway.get_position(self.position_target).await?)
    }

    /// Heading reported by the robot script
    pub async fn heading<G: SimulatorGateway + Sync>(&self, gateway: &G) -> Result<f64> {
        let reply = gateway
            .call_script_function(ScriptCall::new(&self.script, script_fn::GET_ROBOT_ANGLE))
            .await?;
        let angle = reply.floats.first().copied().ok_or_else(|| {
            GatewayError::script_call(&self.script, script_fn::GET_ROBOT_ANGLE, "empty reply")
        })?;
        Ok(f64::from(angle))
    }

    /// Start (or, with zero, end) an in-place rotation
    pub async fn turn<G: SimulatorGateway + Sync>(&self, gateway: &G, speed: f64) -> Result<()> {
        gateway
            .call_script_function(
                ScriptCall::new(&self.script, script_fn::TURN).with_floats(vec![speed as f32]),
            )
            .await?;
        Ok(())
    }

    /// Drive forward until a noisy version of `distance` is covered.
    ///
    /// The perturbed target is drawn once. Every iteration re-issues
    /// `forward` and polls the position once.
    #[instrument(
        name = "motion_move_distance",
        skip(self, gateway, noise),
        fields(script = %self.script)
    )]
    pub async fn move_distance<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        noise: &mut MeasurementNoise,
        distance: f64,
        speed: f64,
        limit: ConvergenceLimit,
    ) -> Result<MotionOutcome> {
        let target = noise.sample(distance);
        debug!(distance, target, "perturbed distance target");

        let progress = self.poll_distance(gateway, target, speed, limit).await;
        let stopped = self.stop(gateway).await;
        let progress = progress?;
        stopped?;
        Ok(self.finish(MotionKind::MoveDistance, target, progress))
    }

    async fn poll_distance<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        target: f64,
        speed: f64,
        limit: ConvergenceLimit,
    ) -> Result<Progress> {
        let start = self.position(gateway).await?;
        let started = Instant::now();
        let mut traveled = 0.0;
        let mut polls = 0;

        while traveled < target {
            if limit.exceeded(polls, started) {
                return Ok(Progress {
                    achieved: traveled,
                    polls,
                    converged: false,
                });
            }
            self.forward(gateway, speed).await?;
            let current = self.position(gateway).await?;
            polls += 1;
            traveled = start.planar_distance(&current);
        }
        Ok(Progress {
            achieved: traveled,
            polls,
            converged: true,
        })
    }

    /// Drive forward by exactly `delta` (no noise), issuing `forward` once
    #[instrument(name = "motion_move_by", skip(self, gateway), fields(script = %self.script))]
    pub async fn move_by<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        delta: f64,
        speed: f64,
        limit: ConvergenceLimit,
    ) -> Result<MotionOutcome> {
        let progress = self.poll_move_by(gateway, delta, speed, limit).await;
        let stopped = self.stop(gateway).await;
        let progress = progress?;
        stopped?;
        Ok(self.finish(MotionKind::MoveBy, delta, progress))
    }

    async fn poll_move_by<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        delta: f64,
        speed: f64,
        limit: ConvergenceLimit,
    ) -> Result<Progress> {
        let start = self.position(gateway).await?;
        self.forward(gateway, speed).await?;
        let started = Instant::now();
        let mut traveled = 0.0;
        let mut polls = 0;

        while traveled < delta {
            if limit.exceeded(polls, started) {
                return Ok(Progress {
                    achieved: traveled,
                    polls,
                    converged: false,
                });
            }
            let current = self.position(gateway).await?;
            polls += 1;
            traveled = start.planar_distance(&current);
        }
        Ok(Progress {
            achieved: traveled,
            polls,
            converged: true,
        })
    }

    /// Rotate in place until the accumulated absolute heading change reaches
    /// `angle` (script units, radians).
    ///
    /// One noise offset is drawn and added to every heading sample.
    #[instrument(
        name = "motion_turn_angle",
        skip(self, gateway, noise),
        fields(script = %self.script)
    )]
    pub async fn turn_angle<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        noise: &mut MeasurementNoise,
        angle: f64,
        speed: f64,
        limit: ConvergenceLimit,
    ) -> Result<MotionOutcome> {
        let offset = noise.sample(0.0);
        let progress = self.poll_turn(gateway, offset, angle, speed, limit).await;
        let stopped = self.turn(gateway, 0.0).await;
        let progress = progress?;
        stopped?;
        Ok(self.finish(MotionKind::TurnAngle, angle, progress))
    }

    async fn poll_turn<G: SimulatorGateway + Sync>(
        &self,
        gateway: &G,
        offset: f64,
        angle: f64,
        speed: f64,
        limit: ConvergenceLimit,
    ) -> Result<Progress> {
        let mut previous = self.heading(gateway).await? + offset;
        self.turn(gateway, speed).await?;
        let started = Instant::now();
        let mut accumulated = 0.0;
        let mut polls = 0;

        while accumulated < angle {
            if limit.exceeded(polls, started) {
                return Ok(Progress {
                    achieved: accumulated,
                    polls,
                    converged: false,
                });
            }
            let current = self.heading(gateway).await? + offset;
            polls += 1;
            accumulated += (current - previous).abs();
            previous = current;
        }
        Ok(Progress {
            achieved: accumulated,
            polls,
            converged: true,
        })
    }

    fn finish(&self, kind: MotionKind, target: f64, progress: Progress) -> MotionOutcome {
        let Progress {
            achieved,
            polls,
            converged,
        } = progress;
        let outcome = if converged {
            debug!(%kind, target, achieved, polls, "motion converged");
            MotionOutcome::Converged {
                target,
                achieved,
                polls,
            }
        } else {
            warn!(%kind, target, achieved, polls, script = %self.script, "motion timed out, stopped");
            MotionOutcome::TimedOut {
                target,
                achieved,
                polls,
            }
        };
        observability::record_convergence(kind, &outcome);
        outcome
    }
}
