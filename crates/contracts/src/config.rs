//! ServerConfig - Config Loader output
//!
//! Describes the simulator endpoint, the HTTP listener, motion limits,
//! the fleet size and the LIDAR signal protocol. Every section is defaulted.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    #[serde(default)]
    #[validate(nested)]
    pub simulator: SimulatorConfig,

    #[serde(default)]
    #[validate(nested)]
    pub server: HttpConfig,

    #[serde(default)]
    #[validate(nested)]
    pub motion: MotionConfig,

    #[serde(default)]
    #[validate(nested)]
    pub fleet: FleetConfig,

    #[serde(default)]
    #[validate(nested)]
    pub lidar: LidarConfig,
}

/// Simulator endpoint and asset layout
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimulatorConfig {
    /// Remote API host
    #[serde(default = "default_sim_host")]
    #[validate(length(min = 1))]
    pub host: String,

    /// Remote API port
    #[serde(default = "default_sim_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    /// Scene loaded right after a successful connect
    #[serde(default = "default_scene")]
    #[validate(length(min = 1))]
    pub default_scene: String,

    /// Prefix prepended to scene names
    #[serde(default = "default_scenes_dir")]
    pub scenes_dir: String,

    /// Prefix prepended to model names
    #[serde(default = "default_models_dir")]
    pub models_dir: String,

    /// Scene object owning the rotation script (instance suffix is appended)
    #[serde(default = "default_robot_script")]
    #[validate(length(min = 1))]
    pub robot_script: String,

    /// Connect as soon as the server starts
    #[serde(default)]
    pub connect_on_start: bool,
}

fn default_sim_host() -> String {
    "127.0.0.1".to_string()
}

fn default_sim_port() -> u16 {
    19997
}

fn default_scene() -> String {
    "Simple.ttt".to_string()
}

fn default_scenes_dir() -> String {
    "Scenes/".to_string()
}

fn default_models_dir() -> String {
    "Models/".to_string()
}

fn default_robot_script() -> String {
    "youBot_ref".to_string()
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            host: default_sim_host(),
            port: default_sim_port(),
            default_scene: default_scene(),
            scenes_dir: default_scenes_dir(),
            models_dir: default_models_dir(),
            robot_script: default_robot_script(),
            connect_on_start: false,
        }
    }
}

/// HTTP command listener
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HttpConfig {
    #[serde(default = "default_http_host")]
    #[validate(length(min = 1))]
    pub host: String,

    #[serde(default = "default_http_port")]
    pub port: u16,
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    5000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
        }
    }
}

/// Motion noise and convergence bounds
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MotionConfig {
    /// Initial measurement noise standard deviation for new robots
    #[serde(default = "default_noise_std_dev")]
    #[validate(range(min = 0.0))]
    pub noise_std_dev: f64,

    /// Seed for reproducible noise (robot i uses seed + i)
    #[serde(default)]
    pub noise_seed: Option<u64>,

    /// Maximum polls of one convergence loop
    #[serde(default = "default_max_polls")]
    #[validate(range(min = 1))]
    pub max_polls: u64,

    /// Wall-clock bound of one convergence loop
    #[serde(default = "default_deadline_ms")]
    #[validate(range(min = 1))]
    pub deadline_ms: Option<u64>,

    /// Speed used by `move` when the caller gives none
    #[serde(default = "default_move_speed")]
    pub move_speed: f64,
}

fn default_noise_std_dev() -> f64 {
    0.01
}

fn default_max_polls() -> u64 {
    100_000
}

fn default_deadline_ms() -> Option<u64> {
    Some(60_000)
}

fn default_move_speed() -> f64 {
    0.5
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            noise_std_dev: default_noise_std_dev(),
            noise_seed: None,
            max_polls: default_max_polls(),
            deadline_ms: default_deadline_ms(),
            move_speed: default_move_speed(),
        }
    }
}

/// Fleet sizing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FleetConfig {
    /// Number of usable instance suffixes (at most 11)
    #[serde(default = "default_suffix_pool_size")]
    #[validate(range(min = 1, max = 11))]
    pub suffix_pool_size: usize,
}

fn default_suffix_pool_size() -> usize {
    crate::SUFFIXES.len()
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            suffix_pool_size: default_suffix_pool_size(),
        }
    }
}

/// LIDAR string-signal protocol
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LidarConfig {
    /// Signal carrying packed `f32` ranges
    #[serde(default = "default_lidar_signal")]
    #[validate(length(min = 1))]
    pub signal: String,

    /// Pause between the streaming subscribe and the first buffered read
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Maximum buffered reads before giving up
    #[serde(default = "default_lidar_max_polls")]
    #[validate(range(min = 1))]
    pub max_polls: u64,
}

fn default_lidar_signal() -> String {
    "scan ranges".to_string()
}

fn default_settle_ms() -> u64 {
    100
}

fn default_lidar_max_polls() -> u64 {
    10_000
}

impl Default for LidarConfig {
    fn default() -> Self {
        Self {
            signal: default_lidar_signal(),
            settle_ms: default_settle_ms(),
            max_polls: default_lidar_max_polls(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_values() {
        let config = ServerConfig::default();
        assert_eq!(config.simulator.port, 19997);
        assert_eq!(config.simulator.default_scene, "Simple.ttt");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.motion.noise_std_dev, 0.01);
        assert_eq!(config.fleet.suffix_pool_size, 11);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.lidar.signal, "scan ranges");
        assert_eq!(config.motion.deadline_ms, Some(60_000));
    }

    #[test]
    fn test_validate_rejects_oversized_pool() {
        let mut config = ServerConfig::default();
        config.fleet.suffix_pool_size = 12;
        assert!(config.validate().is_err());
    }
}
