//! Asset classes and allocation vectors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed deviation of an allocation total from 100.
pub const SUM_TOLERANCE: f64 = 0.01;

/// The four asset classes of the method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stocks,
    Gold,
    Bonds,
    Cash,
}

impl AssetClass {
    /// All asset classes in display order.
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Stocks,
        AssetClass::Gold,
        AssetClass::Bonds,
        AssetClass::Cash,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            AssetClass::Stocks => "Stocks",
            AssetClass::Gold => "Gold",
            AssetClass::Bonds => "Bonds",
            AssetClass::Cash => "Cash",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target weights in percent over {stocks, gold, bonds, cash}.
///
/// Values are built fresh and replaced, never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Allocation {
    pub stocks: f64,
    pub gold: f64,
    pub bonds: f64,
    pub cash: f64,
}

impl Allocation {
    /// Create an allocation from its four weights.
    pub const fn new(stocks: f64, gold: f64, bonds: f64, cash: f64) -> Self {
        Self {
            stocks,
            gold,
            bonds,
            cash,
        }
    }

    /// Build an allocation by evaluating `f` for every asset class.
    pub fn from_fn(mut f: impl FnMut(AssetClass) -> f64) -> Self {
        Self {
            stocks: f(AssetClass::Stocks),
            gold: f(AssetClass::Gold),
            bonds: f(AssetClass::Bonds),
            cash: f(AssetClass::Cash),
        }
    }

    /// Weight of a single asset class.
    pub fn get(&self, asset: AssetClass) -> f64 {
        match asset {
            AssetClass::Stocks => self.stocks,
            AssetClass::Gold => self.gold,
            AssetClass::Bonds => self.bonds,
            AssetClass::Cash => self.cash,
        }
    }

    /// Iterate over (asset, weight) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, f64)> + '_ {
        AssetClass::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    /// Sum of the four weights.
    pub fn total(&self) -> f64 {
        self.stocks + self.gold + self.bonds + self.cash
    }

    /// Whether the weights add up to 100 within [`SUM_TOLERANCE`].
    pub fn is_normalized(&self) -> bool {
        // Three 33.33 weights land exactly on the tolerance edge.
        (self.total() - 100.0).abs() <= SUM_TOLERANCE + 1e-9
    }

    /// Whether every weight is zero or positive.
    pub fn is_non_negative(&self) -> bool {
        self.iter().all(|(_, w)| w >= 0.0)
    }

    /// Whether gold and bonds are held at the same time.
    pub fn holds_gold_and_bonds(&self) -> bool {
        self.gold > 0.0 && self.bonds > 0.0
    }

    /// Linear blend: `self * (1 - ratio) + other * ratio`.
    pub fn blend(&self, other: &Allocation, ratio: f64) -> Allocation {
        let ratio = ratio.clamp(0.0, 1.0);
        Allocation::from_fn(|a| self.get(a) * (1.0 - ratio) + other.get(a) * ratio)
    }

    /// Rescale so the weights sum to 100. A zero allocation is returned as is.
    pub fn normalized(&self) -> Allocation {
        let total = self.total();
        if total <= 0.0 {
            return *self;
        }
        Allocation::from_fn(|a| self.get(a) / total * 100.0)
    }

    /// Largest absolute per-asset difference to another allocation.
    pub fn max_deviation(&self, other: &Allocation) -> f64 {
        AssetClass::ALL
            .iter()
            .map(|&a| (self.get(a) - other.get(a)).abs())
            .fold(0.0, f64::max)
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stocks {:.2}% / gold {:.2}% / bonds {:.2}% / cash {:.2}%",
            self.stocks, self.gold, self.bonds, self.cash
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirds_are_normalized() {
        let allocation = Allocation::new(33.33, 33.33, 0.0, 33.33);
        assert!(allocation.is_normalized());
        assert!(allocation.is_non_negative());
        assert!(!allocation.holds_gold_and_bonds());
    }

    #[test]
    fn test_blend_halfway() {
        let a = Allocation::new(0.0, 50.0, 0.0, 50.0);
        let b = Allocation::new(80.0, 0.0, 20.0, 0.0);
        let mid = a.blend(&b, 0.5);

        assert!((mid.stocks - 40.0).abs() < 1e-10);
        assert!((mid.gold - 25.0).abs() < 1e-10);
        assert!((mid.bonds - 10.0).abs() < 1e-10);
        assert!((mid.cash - 25.0).abs() < 1e-10);
        assert!(mid.is_normalized());
    }

    #[test]
    fn test_normalized_rescales() {
        let allocation = Allocation::new(10.0, 10.0, 0.0, 30.0).normalized();
        assert!((allocation.cash - 60.0).abs() < 1e-10);
        assert!(allocation.is_normalized());

        let zero = Allocation::default().normalized();
        assert_eq!(zero, Allocation::default());
    }

    #[test]
    fn test_max_deviation() {
        let a = Allocation::new(33.33, 0.0, 33.33, 33.33);
        let b = Allocation::new(0.0, 50.0, 0.0, 50.0);
        assert!((a.max_deviation(&b) - 50.0).abs() < 1e-10);
    }
}
