//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::ServerConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    simulator: String,
    listen: String,
    default_scene: String,
    suffix_pool_size: usize,
    noise_std_dev: f64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    simulator: format!("{}:{}", config.simulator.host, config.simulator.port),
                    listen: format!("{}:{}", config.server.host, config.server.port),
                    default_scene: config.simulator.default_scene.clone(),
                    suffix_pool_size: config.fleet.suffix_pool_size,
                    noise_std_dev: config.motion.noise_std_dev,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Non-fatal issues
fn collect_warnings(config: &ServerConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.motion.deadline_ms.is_none() {
        warnings.push(
            "motion.deadline_ms is unset - convergence loops are bounded by polls only"
                .to_string(),
        );
    }

    if config.motion.noise_std_dev == 0.0 {
        warnings.push("motion.noise_std_dev is 0 - motion targets are exact".to_string());
    }

    if config.motion.noise_seed.is_some() {
        warnings.push("motion.noise_seed is set - noise is reproducible across runs".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Simulator: {}", summary.simulator);
            println!("  Listen: {}", summary.listen);
            println!("  Default scene: {}", summary.default_scene);
            println!("  Suffix pool: {}", summary.suffix_pool_size);
            println!("  Noise std dev: {}", summary.noise_std_dev);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
