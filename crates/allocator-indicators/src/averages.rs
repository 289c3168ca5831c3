//! Moving-average providers.

use allocator_core::traits::MovingAverageProvider;
use allocator_core::types::{MovingAverages, STOCKS_GOLD_SCALE};
use tracing::debug;

use crate::history::SyntheticRatioHistory;
use crate::ratio::mean_ratio;

/// Fixed reference constants (gold/bonds 2.38, stocks/gold 31.2).
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceAverages;

impl MovingAverageProvider for ReferenceAverages {
    fn moving_averages(&self) -> MovingAverages {
        MovingAverages::reference()
    }

    fn name(&self) -> &str {
        "reference"
    }
}

/// Averages computed from weekly closes of the three tracked assets.
///
/// The mean runs over every aligned point available, so a 7-year fetch
/// window yields the 7-year average.
#[derive(Debug, Clone, Default)]
pub struct HistoricalAverages {
    gold: Vec<f64>,
    bonds: Vec<f64>,
    stocks: Vec<f64>,
}

impl HistoricalAverages {
    /// Create from weekly closes, oldest first.
    pub fn new(gold: Vec<f64>, bonds: Vec<f64>, stocks: Vec<f64>) -> Self {
        Self {
            gold,
            bonds,
            stocks,
        }
    }
}

impl MovingAverageProvider for HistoricalAverages {
    fn moving_averages(&self) -> MovingAverages {
        let averages = MovingAverages {
            gold_bonds: mean_ratio(&self.gold, &self.bonds, 1.0),
            stocks_gold: mean_ratio(&self.stocks, &self.gold, STOCKS_GOLD_SCALE),
        };
        debug!(?averages, "Computed historical moving averages");
        averages
    }

    fn name(&self) -> &str {
        "historical"
    }
}

/// Trailing 84-month averages of the synthetic cycle history.
#[derive(Debug, Clone)]
pub struct SyntheticAverages {
    history: SyntheticRatioHistory,
}

impl SyntheticAverages {
    /// Build the history through `end_year`.
    pub fn new(end_year: i32) -> Self {
        Self {
            history: SyntheticRatioHistory::generate(end_year),
        }
    }

    pub fn history(&self) -> &SyntheticRatioHistory {
        &self.history
    }
}

impl MovingAverageProvider for SyntheticAverages {
    fn moving_averages(&self) -> MovingAverages {
        self.history
            .latest()
            .map(|(_, averages)| averages)
            .unwrap_or_default()
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocator_core::types::{REFERENCE_GOLD_BONDS_MA, REFERENCE_STOCKS_GOLD_MA};

    #[test]
    fn test_reference_provider() {
        let averages = ReferenceAverages.moving_averages();
        assert_eq!(averages.gold_bonds, Some(REFERENCE_GOLD_BONDS_MA));
        assert_eq!(averages.stocks_gold, Some(REFERENCE_STOCKS_GOLD_MA));
    }

    #[test]
    fn test_historical_provider() {
        let provider = HistoricalAverages::new(
            vec![200.0, 240.0],
            vec![100.0, 100.0],
            vec![60.0, 60.0],
        );
        let averages = provider.moving_averages();

        // (2.0 + 2.4) / 2
        assert!((averages.gold_bonds.unwrap() - 2.2).abs() < 1e-10);
        // (30 + 25) / 2
        assert!((averages.stocks_gold.unwrap() - 27.5).abs() < 1e-10);
    }

    #[test]
    fn test_historical_provider_missing_series() {
        let provider = HistoricalAverages::new(vec![200.0], vec![], vec![60.0]);
        let averages = provider.moving_averages();

        assert!(averages.gold_bonds.is_none());
        assert!(averages.stocks_gold.is_some());
        assert_eq!(averages.gold_bonds_or_reference(), REFERENCE_GOLD_BONDS_MA);
    }

    #[test]
    fn test_synthetic_provider_short_history() {
        let averages = SyntheticAverages::new(1974).moving_averages();
        assert_eq!(averages, MovingAverages::default());
    }
}
