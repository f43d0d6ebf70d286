//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a `ServerConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("simfleet.toml")).unwrap();
//! println!("Simulator: {}:{}", config.simulator.host, config.simulator.port);
//! ```

mod parser;
mod validator;

pub use contracts::ServerConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<ServerConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load from `path` when given, otherwise validated defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<ServerConfig, ContractError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                let config = ServerConfig::default();
                validator::validate(&config)?;
                Ok(config)
            }
        }
    }

    /// Load configuration from string
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<ServerConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Re-run validation, e.g. after command line overrides
    pub fn validate(config: &ServerConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(config: &ServerConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize configuration to JSON string
    pub fn to_json(config: &ServerConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }

    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_TOML: &str = r#"
[simulator]
host = "192.168.1.20"
port = 19999
robot_script = "youBot_ref"

[server]
port = 5001

[motion]
noise_std_dev = 0.02
max_polls = 5000

[fleet]
suffix_pool_size = 4
"#;

    #[test]
    fn test_load_from_path_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(SAMPLE_TOML.as_bytes()).unwrap();

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.simulator.host, "192.168.1.20");
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.fleet.suffix_pool_size, 4);
        assert_eq!(config.lidar.settle_ms, 100);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ConfigLoader::load_from_path(Path::new("/nonexistent/simfleet.toml")).unwrap_err();
        assert!(matches!(err, ContractError::Io(_)));
    }

    #[test]
    fn test_load_or_default() {
        let config = ConfigLoader::load_or_default(None).unwrap();
        assert_eq!(config.simulator.default_scene, "Simple.ttt");
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::load_from_str(SAMPLE_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let again = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(again.simulator.port, 19999);
        assert_eq!(again.motion.max_polls, 5000);
    }

    #[test]
    fn test_json_output_parses() {
        let config = ConfigLoader::load_or_default(None).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let again = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(again.server.port, config.server.port);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let err = ConfigLoader::load_from_str("[fleet]\nsuffix_pool_size = 12\n", ConfigFormat::Toml)
            .unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }
}
