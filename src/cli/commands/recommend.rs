//! Recommend command implementation.

use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

use super::common::{compute, decision, load, report_view};
use crate::cli::{OutputFormat, RecommendArgs};

pub async fn run(args: RecommendArgs, config_path: &Path, offline: bool) -> Result<()> {
    let portfolio = args.portfolio.portfolio();
    if portfolio.is_empty() {
        bail!("The portfolio is empty; pass holdings with --stocks, --gold, --bonds and --cash");
    }

    let mut config = load(config_path)?;
    if let Some(tolerance) = args.tolerance {
        if tolerance < 0.0 {
            bail!("Tolerance must not be negative, got {tolerance}");
        }
        config.allocation.tolerance = tolerance;
    }
    info!(total = %portfolio.total(), "Computing recommendations");

    let session = compute(config, offline, args.mode.map(Into::into), portfolio).await?;
    let decision = decision(&session)?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&decision.recommendations)?);
        }
        OutputFormat::Text => println!("{}", report_view(decision).render()),
    }

    Ok(())
}
