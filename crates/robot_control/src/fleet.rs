//! Fleet registry
//!
//! Robots are numbered in creation order and never removed individually;
//! the whole fleet is dropped when the scene goes away.

use contracts::{InstanceSuffix, RobotIndex, SuffixPool};
use sim_gateway::SimulatorGateway;
use tracing::{info, instrument, warn};

use crate::error::{ControlError, Result};
use crate::robot::{Robot, RobotSummary, RobotTemplate};

#[derive(Debug)]
pub struct Fleet {
    robots: Vec<Robot>,
    pool: SuffixPool,
}

impl Fleet {
    /// Fleet whose suffix pool holds the first `pool_size` suffixes
    pub fn new(pool_size: usize) -> Self {
        Self {
            robots: Vec::new(),
            pool: SuffixPool::with_capacity(pool_size),
        }
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Mark the first free suffix as held
    pub fn allocate_suffix(&mut self) -> Option<InstanceSuffix> {
        self.pool.allocate()
    }

    /// Load one more copy of `model_path` and register it.
    ///
    /// The suffix is taken before the load so the simulator's own copy
    /// naming and ours stay in step. Nothing is registered and the suffix
    /// is given back if any later step fails.
    #[instrument(name = "fleet_add_robot", skip(self, gateway, template), fields(fleet_size = self.robots.len()))]
    pub async fn add_robot<G: SimulatorGateway + Sync>(
        &mut self,
        gateway: &G,
        model_path: &str,
        template: &RobotTemplate,
    ) -> Result<RobotIndex> {
        let suffix = self
            .allocate_suffix()
            .ok_or(ControlError::SuffixPoolExhausted {
                capacity: self.pool.capacity(),
            })?;
        let index = self.robots.len();

        let spawned: Result<Robot> = async {
            gateway.load_model(model_path).await?;
            Robot::spawn(gateway, index, suffix, template).await
        }
        .await;

        match spawned {
            Ok(robot) => {
                self.robots.push(robot);
                observability::record_fleet_size(self.robots.len());
                info!(index, suffix = %suffix, "robot added");
                Ok(index)
            }
            Err(e) => {
                self.pool.release(suffix);
                warn!(error = %e, suffix = %suffix, "add robot failed, suffix released");
                Err(e)
            }
        }
    }

    pub fn robot(&self, index: RobotIndex) -> Result<&Robot> {
        let fleet_size = self.robots.len();
        self.robots
            .get(index)
            .ok_or(ControlError::RobotNotFound { index, fleet_size })
    }

    pub fn robot_mut(&mut self, index: RobotIndex) -> Result<&mut Robot> {
        let fleet_size = self.robots.len();
        self.robots
            .get_mut(index)
            .ok_or(ControlError::RobotNotFound { index, fleet_size })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Robot> {
        self.robots.iter()
    }

    pub fn summaries(&self) -> Vec<RobotSummary> {
        self.robots.iter().map(Robot::summary).collect()
    }

    /// Forget every robot and free every suffix
    pub fn clear(&mut self) {
        if !self.robots.is_empty() {
            info!(robots = self.robots.len(), "fleet cleared");
        }
        self.robots.clear();
        self.pool.clear();
        observability::record_fleet_size(0);
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new(contracts::SUFFIXES.len())
    }
}
