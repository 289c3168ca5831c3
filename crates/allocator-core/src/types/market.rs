//! Price ratios, moving averages and quotes.

use serde::{Deserialize, Serialize};

/// Reference 7-year average of the gold/bonds ratio.
pub const REFERENCE_GOLD_BONDS_MA: f64 = 2.38;

/// Reference 7-year average of the stocks/gold ratio.
pub const REFERENCE_STOCKS_GOLD_MA: f64 = 31.2;

/// Gold is quoted per hundred units when forming the stocks/gold ratio.
pub const STOCKS_GOLD_SCALE: f64 = 100.0;

fn usable(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Current values of the two regime ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioPair {
    /// Gold price divided by bonds price
    pub gold_bonds: f64,
    /// Stocks price divided by (gold price / 100)
    pub stocks_gold: f64,
}

impl RatioPair {
    /// Create a ratio pair.
    pub fn new(gold_bonds: f64, stocks_gold: f64) -> Self {
        Self {
            gold_bonds,
            stocks_gold,
        }
    }

    /// Derive both ratios from asset prices.
    pub fn from_prices(gold: f64, bonds: f64, stocks: f64) -> Self {
        let gold_bonds = if bonds > 0.0 { gold / bonds } else { 0.0 };
        let stocks_gold = if gold > 0.0 {
            stocks / (gold / STOCKS_GOLD_SCALE)
        } else {
            0.0
        };
        Self {
            gold_bonds,
            stocks_gold,
        }
    }

    /// The gold/bonds ratio if it is positive and finite.
    pub fn usable_gold_bonds(&self) -> Option<f64> {
        usable(self.gold_bonds)
    }

    /// The stocks/gold ratio if it is positive and finite.
    pub fn usable_stocks_gold(&self) -> Option<f64> {
        usable(self.stocks_gold)
    }
}

/// 7-year moving averages of both ratios. A missing side is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MovingAverages {
    pub gold_bonds: Option<f64>,
    pub stocks_gold: Option<f64>,
}

impl MovingAverages {
    /// Create from two known averages.
    pub fn new(gold_bonds: f64, stocks_gold: f64) -> Self {
        Self {
            gold_bonds: Some(gold_bonds),
            stocks_gold: Some(stocks_gold),
        }
    }

    /// The fixed reference constants.
    pub fn reference() -> Self {
        Self::new(REFERENCE_GOLD_BONDS_MA, REFERENCE_STOCKS_GOLD_MA)
    }

    /// Gold/bonds average, or the reference constant when unusable.
    pub fn gold_bonds_or_reference(&self) -> f64 {
        self.gold_bonds
            .and_then(usable)
            .unwrap_or(REFERENCE_GOLD_BONDS_MA)
    }

    /// Stocks/gold average, or the reference constant when unusable.
    pub fn stocks_gold_or_reference(&self) -> f64 {
        self.stocks_gold
            .and_then(usable)
            .unwrap_or(REFERENCE_STOCKS_GOLD_MA)
    }

    /// Both averages with reference substitution applied.
    pub fn resolved(&self) -> Self {
        Self::new(
            self.gold_bonds_or_reference(),
            self.stocks_gold_or_reference(),
        )
    }

    /// Fill each missing side from `other`.
    pub fn or(self, other: MovingAverages) -> Self {
        Self {
            gold_bonds: self.gold_bonds.and_then(usable).or(other.gold_bonds),
            stocks_gold: self.stocks_gold.and_then(usable).or(other.stocks_gold),
        }
    }
}

/// A last-price quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol
    pub symbol: String,
    /// Current price
    pub price: f64,
    /// Absolute change since previous close
    pub change: f64,
    /// Change since previous close in percent
    pub change_percent: f64,
    /// Timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl Quote {
    /// Previous close implied by price and change.
    pub fn previous_close(&self) -> f64 {
        self.price - self.change
    }

    /// Whether the quote carries a usable price.
    pub fn is_valid(&self) -> bool {
        usable(self.price).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratios_from_prices() {
        let ratios = RatioPair::from_prices(200.0, 85.0, 60.0);
        assert!((ratios.gold_bonds - 2.3529).abs() < 1e-3);
        assert!((ratios.stocks_gold - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_ratios_from_zero_prices() {
        let ratios = RatioPair::from_prices(0.0, 0.0, 60.0);
        assert!(ratios.usable_gold_bonds().is_none());
        assert!(ratios.usable_stocks_gold().is_none());
    }

    #[test]
    fn test_moving_average_substitution() {
        let averages = MovingAverages {
            gold_bonds: Some(-1.0),
            stocks_gold: None,
        };
        assert_eq!(averages.gold_bonds_or_reference(), REFERENCE_GOLD_BONDS_MA);
        assert_eq!(averages.stocks_gold_or_reference(), REFERENCE_STOCKS_GOLD_MA);

        let partial = MovingAverages {
            gold_bonds: Some(2.5),
            stocks_gold: None,
        }
        .or(MovingAverages::reference());
        assert_eq!(partial, MovingAverages::new(2.5, REFERENCE_STOCKS_GOLD_MA));
    }

    #[test]
    fn test_quote_previous_close() {
        let quote = Quote {
            symbol: "GLD".to_string(),
            price: 201.5,
            change: 1.5,
            change_percent: 0.75,
            timestamp: 1000,
        };
        assert!((quote.previous_close() - 200.0).abs() < 1e-10);
        assert!(quote.is_valid());
    }
}
