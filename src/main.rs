//! Ratio allocator CLI application.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

use allocator_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging settings come from the file when it loads; commands report
    // configuration errors themselves.
    let logging = allocator_config::load_or_default(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_default();
    let level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| logging.level.clone());
    let _log_guard = setup_logging(
        &level,
        cli.json_logs || logging.is_json(),
        logging.file.as_deref().map(Path::new),
    );

    match cli.command {
        Commands::Signals(args) => {
            cli::commands::signals::run(args, &cli.config, cli.offline).await
        }
        Commands::Recommend(args) => {
            cli::commands::recommend::run(args, &cli.config, cli.offline).await
        }
        Commands::Export(args) => cli::commands::export::run(args, &cli.config, cli.offline).await,
        Commands::Watch(args) => cli::commands::watch::run(args, &cli.config, cli.offline).await,
        Commands::Proxy(args) => cli::commands::proxy::run(args, &cli.config, cli.offline).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
