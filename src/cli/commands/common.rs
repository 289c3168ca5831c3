//! Helpers shared by the commands.

use allocator_config::AppConfig;
use allocator_core::types::{AllocationMode, UserPortfolio};
use allocator_engine::{build_sources, Decision, MarketService, RefreshOutcome, Session};
use allocator_monitor::ReportView;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;

/// Load and validate the configuration; a missing file means defaults.
pub fn load(config_path: &Path) -> Result<AppConfig> {
    let config = allocator_config::load_or_default(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub fn market_service(config: &AppConfig, offline: bool) -> Result<MarketService> {
    let (quotes, history) =
        build_sources(config, offline).context("Failed to set up market data sources")?;
    Ok(MarketService::new(quotes, history, &config.market))
}

/// One refresh and decision for the given holdings.
pub async fn compute(
    config: AppConfig,
    offline: bool,
    mode: Option<AllocationMode>,
    portfolio: UserPortfolio,
) -> Result<Session> {
    let service = market_service(&config, offline)?;
    let mut session = Session::new(config);
    if let Some(mode) = mode {
        session.set_mode(mode);
    }
    session.set_portfolio(portfolio);
    if session.refresh(&service).await != RefreshOutcome::Updated {
        session.recompute(Utc::now());
    }
    Ok(session)
}

pub fn decision(session: &Session) -> Result<&Decision> {
    session
        .decision()
        .context("No allocation could be computed")
}

pub fn report_view(decision: &Decision) -> ReportView<'_> {
    ReportView {
        computed_at: decision.computed_at,
        estimate: &decision.estimate,
        averages: &decision.averages,
        signals: &decision.signals,
        resolution: &decision.resolution,
        target: &decision.target,
        recommendations: &decision.recommendations,
        threat: decision.threat,
        alerts: &decision.alerts,
        warnings: &decision.warnings,
        next_rebalance: decision.next_rebalance,
        reminder: decision.reminder,
    }
}
