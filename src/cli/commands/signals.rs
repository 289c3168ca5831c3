//! Signals command implementation.

use allocator_analytics::PerformanceTargets;
use allocator_core::types::{
    Allocation, MovingAverages, Quadrant, RatioPair, SignalPair, UserPortfolio,
};
use allocator_risk::ThreatLevel;
use allocator_strategy::GrowthAssessment;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::common::{compute, decision, load, report_view};
use crate::cli::{OutputFormat, SignalsArgs};

#[derive(Serialize)]
struct SignalsOutput<'a> {
    signals: &'a SignalPair,
    defaulted: bool,
    ratios: &'a RatioPair,
    averages: &'a MovingAverages,
    quadrant: Quadrant,
    allocation: &'a Allocation,
    growth: &'a GrowthAssessment,
    threat_level: ThreatLevel,
}

pub async fn run(args: SignalsArgs, config_path: &Path, offline: bool) -> Result<()> {
    let config = load(config_path)?;
    let session = compute(
        config,
        offline,
        args.mode.map(Into::into),
        UserPortfolio::default(),
    )
    .await?;
    let decision = decision(&session)?;

    match args.output {
        OutputFormat::Json => {
            let output = SignalsOutput {
                signals: &decision.signals,
                defaulted: decision.defaulted,
                ratios: &decision.estimate.ratios,
                averages: &decision.averages,
                quadrant: decision.resolution.quadrant,
                allocation: &decision.target,
                growth: &decision.resolution.growth,
                threat_level: decision.threat,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("{}", report_view(decision).render());
            if decision.performance.weeks > 0 {
                println!("{}", decision.performance.summary(&PerformanceTargets::default()));
            }
        }
    }

    Ok(())
}
