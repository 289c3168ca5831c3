//! Bear-market threat gauge.
//!
//! A 0-100 score. Under an exit signal it starts at 50 and grows with the
//! stocks/gold deviation, volatility, drawdown and a depressed live ratio.
//! Otherwise it reflects how far both ratios sit from their averages,
//! capped at 50.

use allocator_core::types::{MovingAverages, RatioPair, SignalPair};
use serde::{Deserialize, Serialize};

const EXIT_BASE: f64 = 50.0;
const CALM_CAP: f64 = 50.0;
const VOLATILITY_FLOOR: f64 = 15.0;
const DRAWDOWN_FLOOR: f64 = 10.0;
/// Long-run stocks/gold level used for the depressed-ratio penalty.
const STOCKS_GOLD_LONG_RUN: f64 = 28.5;
const DEPRESSED_FRACTION: f64 = 0.85;
const DEPRESSED_PENALTY: f64 = 20.0;

/// Readings behind the gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatInputs {
    pub signals: SignalPair,
    pub ratios: RatioPair,
    pub averages: MovingAverages,
    /// Annualized volatility in percent
    pub volatility: Option<f64>,
    /// Maximum drawdown in percent, sign ignored
    pub max_drawdown: Option<f64>,
    /// Stocks/gold ratio from live quotes only
    pub live_stocks_gold: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatBand {
    Low,
    Elevated,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatLevel(pub u8);

impl ThreatLevel {
    pub fn assess(inputs: &ThreatInputs) -> Self {
        let averages = inputs.averages.resolved();
        let gb_ma = averages.gold_bonds_or_reference();
        let sg_ma = averages.stocks_gold_or_reference();
        let gb = inputs.ratios.usable_gold_bonds().unwrap_or(gb_ma);
        let sg = inputs.ratios.usable_stocks_gold().unwrap_or(sg_ma);

        let sg_deviation = (sg - sg_ma).abs() / sg_ma;

        let level = if inputs.signals.is_exit() {
            let mut level = EXIT_BASE + sg_deviation * 100.0;

            let volatility = inputs.volatility.unwrap_or(VOLATILITY_FLOOR);
            if volatility > VOLATILITY_FLOOR {
                level += (volatility - VOLATILITY_FLOOR) * 2.0;
            }

            let drawdown = inputs.max_drawdown.map(f64::abs).unwrap_or(DRAWDOWN_FLOOR);
            if drawdown > DRAWDOWN_FLOOR {
                level += (drawdown - DRAWDOWN_FLOOR) * 1.5;
            }

            if let Some(live) = inputs.live_stocks_gold {
                if live < STOCKS_GOLD_LONG_RUN * DEPRESSED_FRACTION {
                    level += DEPRESSED_PENALTY;
                }
            }
            level
        } else {
            let gb_deviation = (gb - gb_ma).abs() / gb_ma;
            ((gb_deviation + sg_deviation) * 100.0).min(CALM_CAP)
        };

        ThreatLevel(level.round().clamp(0.0, 100.0) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn band(&self) -> ThreatBand {
        match self.0 {
            0..=29 => ThreatBand::Low,
            30..=59 => ThreatBand::Elevated,
            _ => ThreatBand::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocator_core::types::{ExitSignal, InflationSignal};

    fn inputs(signals: SignalPair, ratios: RatioPair) -> ThreatInputs {
        ThreatInputs {
            signals,
            ratios,
            averages: MovingAverages::new(2.0, 30.0),
            volatility: None,
            max_drawdown: None,
            live_stocks_gold: None,
        }
    }

    #[test]
    fn test_calm_gauge_is_capped() {
        let level = ThreatLevel::assess(&inputs(SignalPair::default(), RatioPair::new(2.2, 33.0)));
        // 10% + 10%
        assert_eq!(level.value(), 20);
        assert_eq!(level.band(), ThreatBand::Low);

        let level = ThreatLevel::assess(&inputs(SignalPair::default(), RatioPair::new(4.0, 60.0)));
        assert_eq!(level.value(), 50);
    }

    #[test]
    fn test_exit_gauge_accumulates() {
        let signals = SignalPair::new(InflationSignal::Gold, ExitSignal::ExitStocks);
        let base = ThreatLevel::assess(&inputs(signals, RatioPair::new(2.5, 27.0)));
        // 50 + 10
        assert_eq!(base.value(), 60);
        assert_eq!(base.band(), ThreatBand::High);

        let stressed = ThreatLevel::assess(&ThreatInputs {
            volatility: Some(20.0),
            max_drawdown: Some(-14.0),
            live_stocks_gold: Some(20.0),
            ..inputs(signals, RatioPair::new(2.5, 27.0))
        });
        // 60 + 10 + 6 + 20
        assert_eq!(stressed.value(), 96);
    }

    #[test]
    fn test_exit_gauge_clamped() {
        let signals = SignalPair::new(InflationSignal::Bonds, ExitSignal::ExitStocks);
        let level = ThreatLevel::assess(&ThreatInputs {
            volatility: Some(60.0),
            ..inputs(signals, RatioPair::new(2.0, 15.0))
        });
        assert_eq!(level.value(), 100);
    }
}
