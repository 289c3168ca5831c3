//! Economic-growth composite.
//!
//! Seven auxiliary indicators each cast a boolean vote. Votes are weighted
//! and growth is declared when the weighted fraction reaches the policy
//! threshold. The weights are heuristic and live in configuration.

use allocator_core::types::SignalPair;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weekly closes spanning six months.
const SIX_MONTHS_WEEKS: usize = 26;

/// Spread (long minus short change %) below which the curve is flat or inverted.
const YIELD_CURVE_ALERT_SPREAD: f64 = -0.5;

/// Weights and thresholds of the growth composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthPolicy {
    /// Stocks outperformed bonds over six months
    pub relative_performance_weight: f64,
    /// Stocks/bonds price ratio above the valuation baseline
    pub valuation_weight: f64,
    /// Volatility below the low-volatility cutoff
    pub low_volatility_weight: f64,
    /// No exit signal
    pub keep_stocks_weight: f64,
    /// Yield curve not inverted
    pub yield_curve_weight: f64,
    /// Diffusion-index proxy above neutral
    pub diffusion_index_weight: f64,
    /// Favorable phase of the seven-year cycle calendar
    pub economic_cycle_weight: f64,
    /// Weighted fraction at or above which growth is declared
    pub threshold: f64,
    pub valuation_baseline: f64,
    pub low_volatility_cutoff: f64,
    pub diffusion_neutral: f64,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            relative_performance_weight: 1.0,
            valuation_weight: 1.5,
            low_volatility_weight: 0.8,
            keep_stocks_weight: 2.0,
            yield_curve_weight: 1.2,
            diffusion_index_weight: 1.3,
            economic_cycle_weight: 1.5,
            threshold: 0.60,
            valuation_baseline: 2.0,
            low_volatility_cutoff: 20.0,
            diffusion_neutral: 50.0,
        }
    }
}

impl GrowthPolicy {
    fn weights(&self) -> [f64; 7] {
        [
            self.relative_performance_weight,
            self.valuation_weight,
            self.low_volatility_weight,
            self.keep_stocks_weight,
            self.yield_curve_weight,
            self.diffusion_index_weight,
            self.economic_cycle_weight,
        ]
    }

    /// Sum of all weights.
    pub fn max_score(&self) -> f64 {
        self.weights().iter().sum()
    }

    /// Cast the votes and weigh them.
    pub fn assess(&self, indicators: &GrowthIndicators, signals: &SignalPair) -> GrowthAssessment {
        let votes = GrowthVotes {
            stocks_outperform: indicators.stocks_performance_6m > indicators.bonds_performance_6m,
            valuation_elevated: indicators.stocks_bonds_ratio > self.valuation_baseline,
            low_volatility: indicators.volatility < self.low_volatility_cutoff,
            keep_stocks: !signals.is_exit(),
            yield_curve_normal: indicators.yield_curve_normal,
            diffusion_expanding: indicators.diffusion_index > self.diffusion_neutral,
            cycle_favorable: indicators.cycle_favorable,
        };

        let score: f64 = votes
            .as_array()
            .iter()
            .zip(self.weights())
            .filter(|(vote, _)| **vote)
            .map(|(_, weight)| weight)
            .sum();
        let max_score = self.max_score();
        let probability = if max_score > 0.0 { score / max_score } else { 0.0 };
        let is_growth = probability >= self.threshold;

        debug!(
            ?votes,
            probability = format!("{:.1}%", probability * 100.0),
            is_growth,
            "Growth composite assessed"
        );

        GrowthAssessment {
            votes,
            score,
            max_score,
            probability,
            is_growth,
        }
    }
}

/// Raw auxiliary readings feeding the growth votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthIndicators {
    /// Six-month stocks performance in percent
    pub stocks_performance_6m: f64,
    /// Six-month bonds performance in percent
    pub bonds_performance_6m: f64,
    /// Stocks price over bonds price
    pub stocks_bonds_ratio: f64,
    /// Annualized volatility in percent
    pub volatility: f64,
    pub yield_curve_normal: bool,
    /// Diffusion-index proxy on a 30..70 scale
    pub diffusion_index: f64,
    pub cycle_favorable: bool,
}

impl Default for GrowthIndicators {
    fn default() -> Self {
        Self {
            stocks_performance_6m: 0.0,
            bonds_performance_6m: 0.0,
            stocks_bonds_ratio: 0.0,
            volatility: 15.0,
            yield_curve_normal: true,
            diffusion_index: 50.0,
            cycle_favorable: true,
        }
    }
}

/// Individual votes, in weight order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrowthVotes {
    pub stocks_outperform: bool,
    pub valuation_elevated: bool,
    pub low_volatility: bool,
    pub keep_stocks: bool,
    pub yield_curve_normal: bool,
    pub diffusion_expanding: bool,
    pub cycle_favorable: bool,
}

impl GrowthVotes {
    fn as_array(&self) -> [bool; 7] {
        [
            self.stocks_outperform,
            self.valuation_elevated,
            self.low_volatility,
            self.keep_stocks,
            self.yield_curve_normal,
            self.diffusion_expanding,
            self.cycle_favorable,
        ]
    }

    pub fn count(&self) -> usize {
        self.as_array().iter().filter(|v| **v).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthAssessment {
    pub votes: GrowthVotes,
    pub score: f64,
    pub max_score: f64,
    /// Weighted vote fraction in [0, 1]
    pub probability: f64,
    pub is_growth: bool,
}

/// Percent change between the close six months back and the current price.
///
/// Returns 0 with fewer than 26 weekly closes or without a current price.
pub fn six_month_performance(current: Option<f64>, weekly_closes: &[f64]) -> f64 {
    let Some(current) = current else {
        return 0.0;
    };
    if weekly_closes.len() < SIX_MONTHS_WEEKS {
        return 0.0;
    }
    let past = weekly_closes[weekly_closes.len() - SIX_MONTHS_WEEKS];
    if past <= 0.0 || !past.is_finite() {
        return 0.0;
    }
    (current - past) / past * 100.0
}

/// Long-bond minus short-bond daily change, as a curve-shape proxy.
///
/// A missing quote counts as a normal curve.
pub fn yield_curve_normal(long_change_pct: Option<f64>, short_change_pct: Option<f64>) -> bool {
    match (long_change_pct, short_change_pct) {
        (Some(long), Some(short)) => long - short > YIELD_CURVE_ALERT_SPREAD,
        _ => true,
    }
}

/// Cyclical minus defensive daily change, mapped to a PMI-like 30..70 scale.
pub fn estimate_diffusion_index(
    cyclical_change_pct: Option<f64>,
    defensive_change_pct: Option<f64>,
) -> f64 {
    let spread = cyclical_change_pct.unwrap_or(0.0) - defensive_change_pct.unwrap_or(0.0);
    (50.0 + spread * 2.0).clamp(30.0, 70.0)
}

/// Fixed seven-year cycle calendar.
///
/// Recovery and correction phases turn favorable after their first 30%,
/// expansion stays favorable until its last 20%. Years outside the
/// calendar are favorable.
pub fn economic_cycle_favorable(year: i32) -> bool {
    const CYCLE_LENGTH: f64 = 7.0;
    let phase = |start: i32| (year - start) as f64 / CYCLE_LENGTH;
    match year {
        2008..=2015 => phase(2008) > 0.3,
        2016..=2023 => phase(2016) < 0.8,
        2024..=2031 => phase(2024) > 0.3,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocator_core::types::{ExitSignal, InflationSignal};

    fn all_true() -> GrowthIndicators {
        GrowthIndicators {
            stocks_performance_6m: 10.0,
            bonds_performance_6m: 2.0,
            stocks_bonds_ratio: 2.5,
            volatility: 12.0,
            yield_curve_normal: true,
            diffusion_index: 55.0,
            cycle_favorable: true,
        }
    }

    #[test]
    fn test_default_weights() {
        let policy = GrowthPolicy::default();
        assert!((policy.max_score() - 9.3).abs() < 1e-9);
        assert_eq!(policy.threshold, 0.60);
    }

    #[test]
    fn test_all_votes_is_growth() {
        let assessment = GrowthPolicy::default().assess(&all_true(), &SignalPair::default());
        assert_eq!(assessment.votes.count(), 7);
        assert!((assessment.probability - 1.0).abs() < 1e-9);
        assert!(assessment.is_growth);
    }

    #[test]
    fn test_exit_signal_removes_heaviest_vote() {
        let signals = SignalPair::new(InflationSignal::Bonds, ExitSignal::ExitStocks);
        let assessment = GrowthPolicy::default().assess(&all_true(), &signals);
        assert!(!assessment.votes.keep_stocks);
        assert!((assessment.score - 7.3).abs() < 1e-9);
        assert!(assessment.is_growth);
    }

    #[test]
    fn test_below_threshold() {
        let indicators = GrowthIndicators {
            stocks_performance_6m: -1.0,
            stocks_bonds_ratio: 0.7,
            volatility: 25.0,
            diffusion_index: 45.0,
            ..all_true()
        };
        // keep_stocks 2.0 + yield 1.2 + cycle 1.5 = 4.7 / 9.3
        let assessment = GrowthPolicy::default().assess(&indicators, &SignalPair::default());
        assert!((assessment.score - 4.7).abs() < 1e-9);
        assert!(!assessment.is_growth);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = GrowthPolicy {
            relative_performance_weight: 3.0,
            valuation_weight: 2.0,
            low_volatility_weight: 0.0,
            keep_stocks_weight: 0.0,
            yield_curve_weight: 0.0,
            diffusion_index_weight: 0.0,
            economic_cycle_weight: 0.0,
            ..GrowthPolicy::default()
        };
        let indicators = GrowthIndicators {
            stocks_bonds_ratio: 1.0,
            ..all_true()
        };
        let assessment = policy.assess(&indicators, &SignalPair::default());
        assert!((assessment.probability - 0.6).abs() < 1e-12);
        assert!(assessment.is_growth);
    }

    #[test]
    fn test_zero_weights_never_growth() {
        let policy = GrowthPolicy {
            relative_performance_weight: 0.0,
            valuation_weight: 0.0,
            low_volatility_weight: 0.0,
            keep_stocks_weight: 0.0,
            yield_curve_weight: 0.0,
            diffusion_index_weight: 0.0,
            economic_cycle_weight: 0.0,
            ..GrowthPolicy::default()
        };
        assert!(!policy.assess(&all_true(), &SignalPair::default()).is_growth);
    }

    #[test]
    fn test_six_month_performance() {
        let mut closes = vec![100.0; 30];
        closes[30 - 26] = 80.0;
        assert!((six_month_performance(Some(100.0), &closes) - 25.0).abs() < 1e-9);
        assert_eq!(six_month_performance(Some(100.0), &closes[..25]), 0.0);
        assert_eq!(six_month_performance(None, &closes), 0.0);
    }

    #[test]
    fn test_yield_curve() {
        assert!(yield_curve_normal(None, Some(1.0)));
        assert!(yield_curve_normal(Some(0.1), Some(0.2)));
        assert!(!yield_curve_normal(Some(-1.0), Some(0.0)));
        assert!(!yield_curve_normal(Some(-0.5), Some(0.0)));
    }

    #[test]
    fn test_diffusion_index_clamped() {
        assert_eq!(estimate_diffusion_index(Some(1.0), Some(0.5)), 51.0);
        assert_eq!(estimate_diffusion_index(Some(20.0), None), 70.0);
        assert_eq!(estimate_diffusion_index(None, Some(20.0)), 30.0);
        assert_eq!(estimate_diffusion_index(None, None), 50.0);
    }

    #[test]
    fn test_cycle_calendar() {
        assert!(!economic_cycle_favorable(2008));
        assert!(economic_cycle_favorable(2012));
        assert!(economic_cycle_favorable(2016));
        assert!(!economic_cycle_favorable(2022));
        assert!(!economic_cycle_favorable(2026));
        assert!(economic_cycle_favorable(2027));
        assert!(economic_cycle_favorable(1999));
        assert!(economic_cycle_favorable(2040));
    }
}
