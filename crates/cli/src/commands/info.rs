//! `info` command implementation.

use anyhow::Result;
use contracts::ServerConfig;
use tracing::info;

use crate::cli::InfoArgs;
use crate::commands::load_config;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    match args.config {
        Some(ref path) => info!(config = %path.display(), "Loading configuration info"),
        None => info!("No configuration file given, showing defaults"),
    }

    let config = load_config(args.config.as_deref())?;

    if args.json {
        println!("{}", config_loader::ConfigLoader::to_json(&config)?);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn print_config_info(config: &ServerConfig) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Simfleet Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let sim = &config.simulator;
    println!("🖥  Simulator");
    println!("   ├─ Version: {:?}", config.version);
    println!("   ├─ Remote API: {}:{}", sim.host, sim.port);
    println!("   ├─ Default scene: {}{}", sim.scenes_dir, sim.default_scene);
    println!("   ├─ Models dir: {}", sim.models_dir);
    println!("   ├─ Robot script: {}", sim.robot_script);
    println!("   └─ Connect on start: {}", sim.connect_on_start);

    println!("\n🌐 Command server");
    println!("   └─ Listen: {}:{}", config.server.host, config.server.port);

    let motion = &config.motion;
    println!("\n⚙️  Motion");
    println!("   ├─ Noise std dev: {}", motion.noise_std_dev);
    match motion.noise_seed {
        Some(seed) => println!("   ├─ Noise seed: {}", seed),
        None => println!("   ├─ Noise seed: (entropy)"),
    }
    println!("   ├─ Max polls: {}", motion.max_polls);
    match motion.deadline_ms {
        Some(ms) => println!("   ├─ Deadline: {} ms", ms),
        None => println!("   ├─ Deadline: none"),
    }
    println!("   └─ Move speed: {}", motion.move_speed);

    println!("\n🤖 Fleet");
    println!("   └─ Suffix pool: {}", config.fleet.suffix_pool_size);

    let lidar = &config.lidar;
    println!("\n📡 LIDAR");
    println!("   ├─ Signal: {}", lidar.signal);
    println!("   ├─ Settle: {} ms", lidar.settle_ms);
    println!("   └─ Max polls: {}", lidar.max_polls);

    println!();
}
