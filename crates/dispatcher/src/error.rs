//! Dispatcher error types

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::MotionOutcome;
use robot_control::ControlError;
use serde_json::json;
use thiserror::Error;

/// Command failure, rendered as a JSON `{"error": ...}` body
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Control(#[from] ControlError),

    /// Missing, malformed or out-of-range argument
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error("parameter '{parameter}' not found")]
    ParameterNotFound { parameter: String },

    /// Convergence bound hit; the motion has been stopped
    #[error("motion timed out after {} polls", .0.polls())]
    TimedOut(MotionOutcome),

    #[error("image encoding failed: {0}")]
    ImageEncoding(#[from] image::ImageError),
}

impl DispatchError {
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::Control(e) => control_status(e),
            DispatchError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            DispatchError::ParameterNotFound { .. } => StatusCode::NOT_FOUND,
            DispatchError::TimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
            DispatchError::ImageEncoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn control_status(error: &ControlError) -> StatusCode {
    if error.is_unreachable() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    match error {
        ControlError::RobotNotFound { .. } | ControlError::SensorNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        ControlError::InvalidStandardDeviation { .. } => StatusCode::BAD_REQUEST,
        ControlError::SuffixPoolExhausted { .. } => StatusCode::CONFLICT,
        ControlError::HandleResolution { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl From<QueryRejection> for DispatchError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_argument("query", rejection.body_text())
    }
}

impl From<PathRejection> for DispatchError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid_argument("path", rejection.body_text())
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, status = status.as_u16(), "command failed");
        }
        let body = match &self {
            DispatchError::TimedOut(outcome) => json!({
                "error": self.to_string(),
                "outcome": outcome,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
