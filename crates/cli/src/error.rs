//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Command listener could not be bound
    #[error("Failed to bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// Simulator connection at startup failed
    #[error("Failed to connect to simulator at {host}:{port}: {message}")]
    SimulatorConnection {
        host: String,
        port: u16,
        message: String,
    },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn bind(addr: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            addr: addr.into(),
            source,
        }
    }

    pub fn simulator_connection(
        host: impl Into<String>,
        port: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::SimulatorConnection {
            host: host.into(),
            port,
            message: message.into(),
        }
    }
}
