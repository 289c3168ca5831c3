//! Reference-portfolio statistics.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Share invested in the three risk assets; the cash third earns nothing.
const INVESTED_SHARE: f64 = 0.6667;
const RISK_FREE_RATE: f64 = 0.02;

const FALLBACK_RETURN_PCT: f64 = 4.0;
const FALLBACK_VOLATILITY_PCT: f64 = 8.0;
const FALLBACK_SHARPE: f64 = 0.8;
const FALLBACK_DOUBLING_YEARS: f64 = 18.0;

/// Target ranges the method advertises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTargets {
    pub return_pct: (f64, f64),
    pub max_drawdown_pct: f64,
    pub doubling_years: (f64, f64),
    pub volatility_pct: f64,
    pub sharpe: f64,
}

impl Default for PerformanceTargets {
    fn default() -> Self {
        Self {
            return_pct: (4.0, 6.0),
            max_drawdown_pct: -10.0,
            doubling_years: (12.0, 18.0),
            volatility_pct: 8.0,
            sharpe: 0.8,
        }
    }
}

/// Realized statistics of the reference portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Annualized return in percent
    pub annual_return_pct: f64,
    /// Worst peak-to-trough loss in percent (negative)
    pub max_drawdown_pct: f64,
    /// Annualized volatility in percent
    pub volatility_pct: f64,
    pub sharpe_ratio: f64,
    /// Years to double at the annual return
    pub doubling_years: f64,
    /// Weekly returns the figures are based on
    pub weeks: usize,
}

impl PerformanceMetrics {
    /// Figures used before any history is available.
    pub fn reference() -> Self {
        Self {
            annual_return_pct: 5.0,
            max_drawdown_pct: -10.0,
            volatility_pct: 8.0,
            sharpe_ratio: 0.8,
            doubling_years: 14.0,
            weeks: 0,
        }
    }

    /// Weekly returns of the thirds portfolio over the aligned prefix.
    pub fn weekly_returns(gold: &[f64], bonds: &[f64], stocks: &[f64]) -> Vec<f64> {
        let len = gold.len().min(bonds.len()).min(stocks.len());
        let simple = |series: &[f64], i: usize| {
            let prev = series[i - 1];
            if prev > 0.0 {
                (series[i] - prev) / prev
            } else {
                0.0
            }
        };

        (1..len)
            .map(|i| {
                (simple(gold, i) + simple(bonds, i) + simple(stocks, i)) / 3.0 * INVESTED_SHARE
            })
            .collect()
    }

    /// Compute from weekly closes of gold, bonds and stocks.
    pub fn from_weekly_closes(gold: &[f64], bonds: &[f64], stocks: &[f64]) -> Self {
        if gold.is_empty() || bonds.is_empty() || stocks.is_empty() {
            return Self::reference();
        }
        Self::from_returns(&Self::weekly_returns(gold, bonds, stocks))
    }

    pub fn from_returns(returns: &[f64]) -> Self {
        let annual_return_pct = annualized_return_pct(returns);
        let volatility_pct = volatility_pct(returns);
        let metrics = Self {
            annual_return_pct,
            max_drawdown_pct: max_drawdown_pct(returns),
            volatility_pct,
            sharpe_ratio: sharpe_ratio(returns, volatility_pct),
            doubling_years: doubling_years(annual_return_pct),
            weeks: returns.len(),
        };
        debug!(?metrics, "Performance metrics computed");
        metrics
    }

    /// Text summary against the targets.
    pub fn summary(&self, targets: &PerformanceTargets) -> String {
        format!(
            r#"
Reference Portfolio Performance
───────────────────────────────
Annual Return:   {:>7.2}%   (target {:.0}-{:.0}%)
Max Drawdown:    {:>7.2}%   (target {:.0}%)
Volatility:      {:>7.2}%   (target {:.0}%)
Sharpe Ratio:    {:>7.2}    (target {:.1})
Doubling Time:   {:>7.1} y  (target {:.0}-{:.0} y)
Weeks of Data:   {:>7}
"#,
            self.annual_return_pct,
            targets.return_pct.0,
            targets.return_pct.1,
            self.max_drawdown_pct,
            targets.max_drawdown_pct,
            self.volatility_pct,
            targets.volatility_pct,
            self.sharpe_ratio,
            targets.sharpe,
            self.doubling_years,
            targets.doubling_years.0,
            targets.doubling_years.1,
            self.weeks,
        )
    }
}

fn annualized_return_pct(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return FALLBACK_RETURN_PCT;
    }
    let total = returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0;
    let years = returns.len() as f64 / WEEKS_PER_YEAR;
    ((1.0 + total).powf(1.0 / years) - 1.0) * 100.0
}

fn max_drawdown_pct(returns: &[f64]) -> f64 {
    let mut peak = 1.0_f64;
    let mut cumulative = 1.0_f64;
    let mut worst = 0.0_f64;
    for r in returns {
        cumulative *= 1.0 + r;
        peak = peak.max(cumulative);
        worst = worst.min((cumulative - peak) / peak);
    }
    worst * 100.0
}

fn volatility_pct(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return FALLBACK_VOLATILITY_PCT;
    }
    returns.iter().population_std_dev() * WEEKS_PER_YEAR.sqrt() * 100.0
}

fn sharpe_ratio(returns: &[f64], volatility_pct: f64) -> f64 {
    if returns.is_empty() || volatility_pct == 0.0 {
        return FALLBACK_SHARPE;
    }
    let mean = returns.iter().mean();
    let annual = (1.0 + mean).powf(WEEKS_PER_YEAR) - 1.0;
    (annual - RISK_FREE_RATE) / (volatility_pct / 100.0)
}

fn doubling_years(annual_return_pct: f64) -> f64 {
    if annual_return_pct <= 0.0 {
        return FALLBACK_DOUBLING_YEARS;
    }
    2.0_f64.ln() / (1.0 + annual_return_pct / 100.0).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_returns_weighting() {
        let returns = PerformanceMetrics::weekly_returns(
            &[100.0, 110.0],
            &[100.0, 100.0],
            &[100.0, 100.0, 50.0],
        );
        assert_eq!(returns.len(), 1);
        // 10% gold, flat bonds and stocks
        assert!((returns[0] - 0.1 / 3.0 * 0.6667).abs() < 1e-12);
    }

    #[test]
    fn test_flat_series() {
        let flat = vec![100.0; 60];
        let metrics = PerformanceMetrics::from_weekly_closes(&flat, &flat, &flat);
        assert_eq!(metrics.weeks, 59);
        assert!(metrics.annual_return_pct.abs() < 1e-9);
        assert_eq!(metrics.max_drawdown_pct, 0.0);
        assert_eq!(metrics.volatility_pct, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.8);
        assert_eq!(metrics.doubling_years, 18.0);
    }

    #[test]
    fn test_drawdown() {
        assert!((max_drawdown_pct(&[0.1, -0.5, 0.2]) - -50.0).abs() < 1e-9);
        assert!((max_drawdown_pct(&[-0.1, -0.1]) - -19.0).abs() < 1e-9);
    }

    #[test]
    fn test_steady_growth() {
        // 52 weeks at a constant weekly return compounding to 10%
        let weekly = 1.1_f64.powf(1.0 / 52.0) - 1.0;
        let metrics = PerformanceMetrics::from_returns(&vec![weekly; 52]);
        assert!((metrics.annual_return_pct - 10.0).abs() < 1e-6);
        assert!((metrics.doubling_years - 2.0_f64.ln() / 1.1_f64.ln()).abs() < 1e-6);
        assert!(metrics.volatility_pct < 1e-9);
    }

    #[test]
    fn test_sharpe_and_volatility() {
        let returns = [0.01, -0.01, 0.01, -0.01];
        let vol = volatility_pct(&returns);
        assert!((vol - 0.01 * 52.0_f64.sqrt() * 100.0).abs() < 1e-9);
        let sharpe = sharpe_ratio(&returns, vol);
        assert!((sharpe - (-0.02 / (vol / 100.0))).abs() < 1e-9);
    }

    #[test]
    fn test_missing_history_uses_reference() {
        let metrics = PerformanceMetrics::from_weekly_closes(&[], &[1.0], &[1.0]);
        assert_eq!(metrics, PerformanceMetrics::reference());
        assert!(metrics.summary(&PerformanceTargets::default()).contains("Sharpe Ratio"));
    }
}
