//! `serve` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use contracts::ServerConfig;
use robot_control::{Session, SessionSettings};
use sim_gateway::{MockConfig, MockGateway};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cli::ServeArgs;
use crate::commands::load_config;
use crate::error::CliError;

/// Execute the `serve` command
pub async fn run_serve(args: &ServeArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    config_loader::ConfigLoader::validate(&config).context("Invalid command line overrides")?;

    info!(
        listen = %format!("{}:{}", config.server.host, config.server.port),
        simulator = %format!("{}:{}", config.simulator.host, config.simulator.port),
        suffix_pool = config.fleet.suffix_pool_size,
        "Configuration loaded"
    );

    // The in-process kinematic gateway stands in for the remote API
    let gateway = MockGateway::with_config(MockConfig {
        robot_script: config.simulator.robot_script.clone(),
        lidar_signal: config.lidar.signal.clone(),
        ..Default::default()
    });
    let mut session = Session::new(gateway, SessionSettings::from(&config));

    if config.simulator.connect_on_start {
        let (host, port) = (&config.simulator.host, config.simulator.port);
        session
            .connect(host, port)
            .await
            .map_err(|e| CliError::simulator_connection(host, port, e.to_string()))?;
        info!(host = %host, port, "Connected to simulator");
    }

    let app = dispatcher::router(Arc::new(Mutex::new(session)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| CliError::bind(&addr, e))?;
    info!(addr = %addr, "Command server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Command server failed")?;

    info!("simfleet finished");
    Ok(())
}

fn apply_overrides(config: &mut ServerConfig, args: &ServeArgs) {
    if let Some(ref host) = args.host {
        info!(host = %host, "Overriding HTTP host from CLI");
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        info!(port, "Overriding HTTP port from CLI");
        config.server.port = port;
    }
    if let Some(ref host) = args.sim_host {
        info!(host = %host, "Overriding simulator host from CLI");
        config.simulator.host = host.clone();
    }
    if let Some(port) = args.sim_port {
        info!(port, "Overriding simulator port from CLI");
        config.simulator.port = port;
    }
    if args.connect {
        config.simulator.connect_on_start = true;
    }
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    warn!("Received shutdown signal, stopping command server...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn serve_args(argv: &[&str]) -> ServeArgs {
        let mut full = vec!["simfleet", "serve"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Serve(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = ServerConfig::default();
        let args = serve_args(&[
            "--host", "0.0.0.0", "--port", "6000", "--sim-host", "sim", "--sim-port", "20000",
            "--connect",
        ]);

        apply_overrides(&mut config, &args);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.simulator.host, "sim");
        assert_eq!(config.simulator.port, 20000);
        assert!(config.simulator.connect_on_start);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = ServerConfig::default();
        apply_overrides(&mut config, &serve_args(&[]));

        let defaults = ServerConfig::default();
        assert_eq!(config.server.port, defaults.server.port);
        assert_eq!(config.simulator.host, defaults.simulator.host);
        assert!(!config.simulator.connect_on_start);
    }
}
