//! # Simfleet CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - HTTP 命令服务器的启动与优雅关闭

mod cli;
mod commands;
mod error;

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_serve, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(observability_config(&cli))?;

    info!(version = env!("CARGO_PKG_VERSION"), "simfleet starting");

    let result = match &cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

fn observability_config(cli: &Cli) -> ObservabilityConfig {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    // Prometheus 仅在 serve 模式下启用
    let metrics_addr = match &cli.command {
        Commands::Serve(args) => args
            .metrics_port
            .filter(|port| *port != 0)
            .map(|port| SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))),
        _ => None,
    };

    ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_addr,
        default_log_level: default_log_level.to_string(),
    }
}
