//! Route table and per-command middleware

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use observability::CommandStatus;
use robot_control::Session;
use sim_gateway::SimulatorGateway;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Session shared by every request
pub type SharedSession<G> = Arc<Mutex<Session<G>>>;

pub struct AppState<G> {
    pub session: SharedSession<G>,
}

impl<G> AppState<G> {
    pub fn new(session: SharedSession<G>) -> Self {
        Self { session }
    }
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

/// Build the command router over `session`
pub fn router<G>(session: SharedSession<G>) -> Router
where
    G: SimulatorGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/start-v-rep-server", post(handlers::connect::<G>))
        .route("/start-simulation", post(handlers::start_simulation::<G>))
        .route("/pause-simulation", post(handlers::pause_simulation::<G>))
        .route("/stop-simulation", post(handlers::stop_simulation::<G>))
        .route("/print-message", post(handlers::print_message::<G>))
        .route("/load-scene", post(handlers::load_scene::<G>))
        .route("/add-robot", post(handlers::add_robot::<G>))
        .route("/robots", get(handlers::robots::<G>))
        .route("/forward", post(handlers::forward::<G>))
        .route("/backward", post(handlers::backward::<G>))
        .route("/left", post(handlers::left::<G>))
        .route("/right", post(handlers::right::<G>))
        .route("/stop", post(handlers::stop::<G>))
        .route("/replace", post(handlers::replace::<G>))
        .route("/turn-angle", post(handlers::turn_angle::<G>))
        .route("/move-distance", post(handlers::move_distance::<G>))
        .route("/move", post(handlers::move_by::<G>))
        .route("/get-image/:robot", get(handlers::get_image::<G>))
        .route("/get-depth/:robot", get(handlers::get_depth::<G>))
        .route("/get-lidar/:robot", get(handlers::get_lidar::<G>))
        .route("/set-sensor-params", post(handlers::set_sensor_params::<G>))
        .route(
            "/get-sensor-params/:robot/:sensor/:parameter",
            get(handlers::get_sensor_params::<G>),
        )
        .route(
            "/get-sensor-params-list/:robot",
            get(handlers::get_sensor_params_list::<G>),
        )
        .route(
            "/get-standard-deviation/:robot",
            get(handlers::get_standard_deviation::<G>),
        )
        .route(
            "/set-standard-deviation",
            post(handlers::set_standard_deviation::<G>),
        )
        .route_layer(middleware::from_fn(track))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(session))
}

/// Record duration and outcome of every matched command
async fn track(matched: Option<MatchedPath>, request: Request, next: Next) -> Response {
    let command = matched
        .as_ref()
        .map(|path| command_name(path.as_str()).to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let outcome = if status.is_success() {
        CommandStatus::Ok
    } else if status == axum::http::StatusCode::GATEWAY_TIMEOUT {
        CommandStatus::TimedOut
    } else if status.is_client_error() {
        CommandStatus::Rejected
    } else {
        CommandStatus::Failed
    };
    observability::record_command(&command, outcome, started.elapsed());
    tracing::debug!(command = %command, status = status.as_u16(), "command handled");
    response
}

/// `/get-image/:robot` -> `get-image`
fn command_name(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or(path)
}
