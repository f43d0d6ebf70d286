//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Simfleet - HTTP command server for simulated mecanum robots
#[derive(Parser, Debug)]
#[command(
    name = "simfleet",
    author,
    version,
    about = "HTTP command server for simulated mecanum robot fleets",
    long_about = "Serves the robot command set over HTTP.\n\n\
                  Connects to the simulator remote API, loads scenes and robot \n\
                  models, and drives each robot instance of the fleet."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SIMFLEET_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SIMFLEET_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP command server
    Serve(ServeArgs),

    /// Validate configuration file without serving
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the `serve` command
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when absent
    #[arg(short, long, env = "SIMFLEET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override HTTP listen host
    #[arg(long, env = "SIMFLEET_HOST")]
    pub host: Option<String>,

    /// Override HTTP listen port
    #[arg(long, env = "SIMFLEET_PORT")]
    pub port: Option<u16>,

    /// Override simulator remote API host
    #[arg(long, env = "SIMFLEET_SIM_HOST")]
    pub sim_host: Option<String>,

    /// Override simulator remote API port
    #[arg(long, env = "SIMFLEET_SIM_PORT")]
    pub sim_port: Option<u16>,

    /// Connect to the simulator before accepting commands
    #[arg(long)]
    pub connect: bool,

    /// Prometheus metrics port (absent or 0 = disabled)
    #[arg(long, env = "SIMFLEET_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "simfleet.toml", env = "SIMFLEET_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; defaults apply when absent
    #[arg(short, long, env = "SIMFLEET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides_parse() {
        let cli = Cli::try_parse_from([
            "simfleet",
            "-v",
            "serve",
            "--port",
            "5050",
            "--sim-host",
            "10.0.0.5",
            "--connect",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(5050));
                assert_eq!(args.sim_host.as_deref(), Some("10.0.0.5"));
                assert!(args.connect);
                assert_eq!(args.host, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["simfleet", "-q", "-v", "info"]).is_err());
    }
}
