//! Allocation resolver.
//!
//! The exit signal takes absolute priority in both modes. Below it, simple
//! mode splits thirds between stocks, cash and the defensive asset the
//! inflation signal picks; extreme mode consults the growth/inflation
//! quadrant table.

use allocator_core::types::{Allocation, AllocationMode, Quadrant, SignalPair};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::growth::{GrowthAssessment, GrowthIndicators, GrowthPolicy};

/// Outcome of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub allocation: Allocation,
    pub quadrant: Quadrant,
    pub mode: AllocationMode,
    /// Growth composite, computed in both modes for alerting
    pub growth: GrowthAssessment,
}

fn exit_quadrant(signals: &SignalPair) -> Option<Quadrant> {
    if !signals.is_exit() {
        return None;
    }
    Some(if signals.is_inflation() {
        Quadrant::GrizzlyInflation
    } else {
        Quadrant::GrizzlyDeflation
    })
}

/// Quadrant for simple mode.
pub fn resolve_simple(signals: &SignalPair) -> Quadrant {
    exit_quadrant(signals).unwrap_or(if signals.is_inflation() {
        Quadrant::SimpleInflation
    } else {
        Quadrant::SimpleDeflation
    })
}

/// Quadrant for extreme mode.
pub fn resolve_extreme(signals: &SignalPair, is_growth: bool) -> Quadrant {
    if let Some(quadrant) = exit_quadrant(signals) {
        return quadrant;
    }
    match (is_growth, signals.is_inflation()) {
        (true, false) => Quadrant::BoomDeflation,
        (true, true) => Quadrant::BoomInflation,
        (false, true) => Quadrant::RecessionInflation,
        (false, false) => Quadrant::RecessionDeflation,
    }
}

/// Maps a signal pair and mode onto a quadrant allocation.
#[derive(Debug, Clone, Default)]
pub struct AllocationResolver {
    policy: GrowthPolicy,
}

impl AllocationResolver {
    pub fn new(policy: GrowthPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    pub fn resolve(
        &self,
        signals: &SignalPair,
        mode: AllocationMode,
        indicators: &GrowthIndicators,
    ) -> Resolution {
        let growth = self.policy.assess(indicators, signals);
        let quadrant = match mode {
            AllocationMode::Simple => resolve_simple(signals),
            AllocationMode::Extreme => resolve_extreme(signals, growth.is_growth),
        };

        debug!(
            inflation = %signals.inflation,
            exit = %signals.exit,
            %mode,
            %quadrant,
            "Allocation resolved"
        );

        Resolution {
            allocation: quadrant.allocation(),
            quadrant,
            mode,
            growth,
        }
    }
}
