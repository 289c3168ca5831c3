//! Watch command implementation.

use allocator_core::types::{Allocation, Quadrant};
use allocator_engine::{Scheduler, Session, Trigger};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::common::{load, market_service, report_view};
use crate::cli::WatchArgs;

pub async fn run(args: WatchArgs, config_path: &Path, offline: bool) -> Result<()> {
    let mut config = load(config_path)?;
    if args.smooth {
        config.transition.enabled = true;
    }
    let interval = Duration::from_secs(
        args.interval
            .unwrap_or(config.market.refresh_interval_secs)
            .max(1),
    );

    let service = Arc::new(market_service(&config, offline)?);
    let mut session = Session::new(config);
    if let Some(mode) = args.mode {
        session.set_mode(mode.into());
    }
    session.set_portfolio(args.portfolio.portfolio());

    // A line on stdin counts as the user coming back; "r" forces a refresh.
    let (trigger_tx, trigger_rx) = mpsc::channel(4);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let trigger = if line.trim() == "r" {
                Trigger::Now
            } else {
                Trigger::Foreground
            };
            if trigger_tx.send(trigger).await.is_err() {
                break;
            }
        }
    });

    info!(
        interval_secs = interval.as_secs(),
        "Watching; press Enter to refresh if stale, Ctrl-C to stop"
    );

    let mut last: Option<(Quadrant, Allocation)> = None;
    Scheduler::new(service, interval)
        .run(
            &mut session,
            trigger_rx,
            async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "Ctrl-C handler unavailable");
                    std::future::pending::<()>().await;
                }
            },
            |decision| {
                let view = report_view(decision);
                let current = (decision.resolution.quadrant, decision.target);
                if last != Some(current) {
                    println!("{}", view.render());
                    last = Some(current);
                } else {
                    println!("{}", view.headline());
                }
            },
        )
        .await;

    Ok(())
}
