//! Simulator gateway error types

use thiserror::Error;

/// Gateway specific error
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection attempt failed
    #[error("failed to connect to simulator at {host}:{port}: {message}")]
    ConnectionFailed {
        host: String,
        port: u16,
        message: String,
    },

    /// Call issued without an open connection
    #[error("not connected to simulator")]
    NotConnected,

    /// Scene object name could not be resolved
    #[error("scene object '{name}' not found")]
    ObjectNotFound { name: String },

    /// Script function call failed
    #[error("script call {script}.{function} failed: {message}")]
    ScriptCall {
        script: String,
        function: String,
        message: String,
    },

    /// Any other remote call failure
    #[error("remote call '{call}' failed: {message}")]
    Rpc { call: String, message: String },
}

impl GatewayError {
    /// Create remote call error
    pub fn rpc(call: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rpc {
            call: call.into(),
            message: message.into(),
        }
    }

    /// Create script call error
    pub fn script_call(
        script: impl Into<String>,
        function: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ScriptCall {
            script: script.into(),
            function: function.into(),
            message: message.into(),
        }
    }

    /// True when the simulator cannot be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::NotConnected)
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, GatewayError>;
