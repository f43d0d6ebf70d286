//! Per-robot handle registry

use std::ops::Index;

use contracts::{InstanceSuffix, ObjectHandle, Part};
use sim_gateway::SimulatorGateway;
use tracing::{debug, instrument};

use crate::error::{ControlError, Result};

/// Resolved scene handle of every part of one robot.
///
/// Only obtainable through [`RobotHandles::resolve`], so holding one means
/// every part exists in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotHandles {
    handles: [ObjectHandle; Part::COUNT],
}

impl RobotHandles {
    /// Resolve every part of the instance carrying `suffix`.
    ///
    /// One RPC per part, in `Part::ALL` order. The first failure aborts.
    #[instrument(name = "robot_handles_resolve", skip(gateway, suffix), fields(suffix = %suffix))]
    pub async fn resolve<G: SimulatorGateway + Sync>(
        gateway: &G,
        suffix: InstanceSuffix,
    ) -> Result<Self> {
        let mut handles = [0; Part::COUNT];
        for part in Part::ALL {
            let name = suffix.apply(part.object_name());
            let handle = gateway
                .resolve_handle(&name)
                .await
                .map_err(|e| ControlError::handle_resolution(part, &name, &e))?;
            handles[part.index()] = handle;
        }
        debug!(?handles, "robot handles resolved");
        Ok(Self { handles })
    }

    pub fn get(&self, part: Part) -> ObjectHandle {
        self.handles[part.index()]
    }

    /// Wheel joints, RR, RL, FR, FL
    pub fn wheels(&self) -> [ObjectHandle; 4] {
        Part::WHEELS.map(|part| self.get(part))
    }

    /// `(part, handle)` pairs in resolution order
    pub fn iter(&self) -> impl Iterator<Item = (Part, ObjectHandle)> + '_ {
        Part::ALL.into_iter().map(|part| (part, self.get(part)))
    }
}

impl Index<Part> for RobotHandles {
    type Output = ObjectHandle;

    fn index(&self, part: Part) -> &ObjectHandle {
        &self.handles[part.index()]
    }
}
