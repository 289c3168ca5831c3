//! Export command implementation.

use allocator_engine::ExportSnapshot;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;

use super::common::{compute, load};
use crate::cli::ExportArgs;

pub async fn run(args: ExportArgs, config_path: &Path, offline: bool) -> Result<()> {
    let config = load(config_path)?;
    let session = compute(
        config,
        offline,
        args.mode.map(Into::into),
        args.portfolio.portfolio(),
    )
    .await?;

    let snapshot = ExportSnapshot::from_session(&session, Utc::now())?;
    match &args.output {
        Some(path) => {
            snapshot
                .write_to(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Snapshot {} written to {}", snapshot.metadata.snapshot_id, path.display());
        }
        None => println!("{}", snapshot.to_json()?),
    }

    Ok(())
}
