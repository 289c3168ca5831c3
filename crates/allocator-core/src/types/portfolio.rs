//! User holdings and rebalancing recommendations.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Allocation, AssetClass};

/// The user's current holdings in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UserPortfolio {
    pub stocks: Decimal,
    pub gold: Decimal,
    pub bonds: Decimal,
    pub cash: Decimal,
}

impl UserPortfolio {
    /// Create a portfolio from the four holdings.
    pub fn new(stocks: Decimal, gold: Decimal, bonds: Decimal, cash: Decimal) -> Self {
        Self {
            stocks,
            gold,
            bonds,
            cash,
        }
    }

    /// Amount held in one asset class.
    pub fn amount(&self, asset: AssetClass) -> Decimal {
        match asset {
            AssetClass::Stocks => self.stocks,
            AssetClass::Gold => self.gold,
            AssetClass::Bonds => self.bonds,
            AssetClass::Cash => self.cash,
        }
    }

    /// Sum of the four holdings.
    pub fn total(&self) -> Decimal {
        self.stocks + self.gold + self.bonds + self.cash
    }

    pub fn is_empty(&self) -> bool {
        self.total() <= Decimal::ZERO
    }

    /// Share of one asset class in percent, zero for an empty portfolio.
    pub fn percent(&self, asset: AssetClass) -> f64 {
        let total = self.total();
        if total <= Decimal::ZERO {
            return 0.0;
        }
        (self.amount(asset) / total * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0)
    }

    /// Current weights, or `None` for an empty portfolio.
    pub fn current_allocation(&self) -> Option<Allocation> {
        if self.is_empty() {
            return None;
        }
        Some(Allocation::from_fn(|a| self.percent(a)))
    }
}

/// Rebalancing action for one asset class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => f.write_str("BUY"),
            Action::Sell => f.write_str("SELL"),
            Action::Hold => f.write_str("HOLD"),
        }
    }
}

/// Recommendation for a single asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub asset: AssetClass,
    pub current_percent: f64,
    pub target_percent: f64,
    pub action: Action,
    /// Absolute difference between target and current amount
    pub amount_delta: Decimal,
}
