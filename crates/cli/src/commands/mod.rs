//! Command implementations.

mod info;
mod serve;
mod validate;

pub use info::run_info;
pub use serve::run_serve;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::ServerConfig;

use crate::error::CliError;

/// Load `path` when given, defaults otherwise
pub(crate) fn load_config(path: Option<&Path>) -> Result<ServerConfig> {
    if let Some(path) = path {
        if !path.exists() {
            return Err(CliError::config_not_found(path.display().to_string()).into());
        }
    }
    config_loader::ConfigLoader::load_or_default(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Default configuration is invalid".to_string(),
    })
}
