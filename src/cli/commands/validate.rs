//! Validate configuration command.

use allocator_config::load_config;
use anyhow::Result;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Allocation mode: {}", config.allocation.mode);
    println!("Tolerance: {} points", config.allocation.tolerance);
    println!("Transition smoothing: {}", config.transition.enabled);
    println!("Moving averages: {:?}", config.market.average_source);
    println!();
    println!("Effective configuration:");
    println!("{}", config.to_toml()?);

    Ok(())
}
