//! Buy/sell/hold recommendations against a target allocation.

use allocator_core::types::{Action, Allocation, AssetClass, Recommendation, UserPortfolio};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

/// Tolerance band in percentage points.
pub const DEFAULT_TOLERANCE: f64 = 5.0;

/// Diffs holdings against a target allocation.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    tolerance: f64,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl RecommendationEngine {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// One recommendation per asset class, or none for an empty portfolio.
    pub fn recommend(&self, portfolio: &UserPortfolio, target: &Allocation) -> Vec<Recommendation> {
        if portfolio.is_empty() {
            return Vec::new();
        }
        let total = portfolio.total();

        AssetClass::ALL
            .iter()
            .map(|&asset| {
                let current_amount = portfolio.amount(asset);
                let current_percent = portfolio.percent(asset);
                let target_percent = target.get(asset);
                let target_amount = total
                    * Decimal::from_f64(target_percent).unwrap_or(Decimal::ZERO)
                    / Decimal::ONE_HUNDRED;

                let action = if (current_percent - target_percent).abs() <= self.tolerance {
                    Action::Hold
                } else if target_amount > current_amount {
                    Action::Buy
                } else {
                    Action::Sell
                };

                Recommendation {
                    asset,
                    current_percent,
                    target_percent,
                    action,
                    amount_delta: (target_amount - current_amount).abs().round_dp(2),
                }
            })
            .inspect(|r| {
                debug!(
                    asset = %r.asset,
                    action = %r.action,
                    current = format!("{:.2}%", r.current_percent),
                    target = format!("{:.2}%", r.target_percent),
                    "Recommendation"
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn find(recs: &[Recommendation], asset: AssetClass) -> &Recommendation {
        recs.iter().find(|r| r.asset == asset).unwrap()
    }

    #[test]
    fn test_rebalance_out_of_bonds_into_cash() {
        let portfolio = UserPortfolio::new(dec!(16500), dec!(16500), dec!(16500), dec!(500));
        let target = Allocation::new(33.33, 33.33, 0.0, 33.33);
        let recs = RecommendationEngine::default().recommend(&portfolio, &target);
        assert_eq!(recs.len(), 4);

        let bonds = find(&recs, AssetClass::Bonds);
        assert_eq!(bonds.action, Action::Sell);
        assert_eq!(bonds.amount_delta, dec!(16500));

        assert_eq!(find(&recs, AssetClass::Stocks).action, Action::Hold);
        assert_eq!(find(&recs, AssetClass::Gold).action, Action::Hold);

        let cash = find(&recs, AssetClass::Cash);
        assert_eq!(cash.action, Action::Buy);
        // 50000 * 33.33% - 500
        assert_eq!(cash.amount_delta, dec!(16165));
        assert!((cash.current_percent - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_portfolio_has_no_recommendations() {
        let recs = RecommendationEngine::default()
            .recommend(&UserPortfolio::default(), &Allocation::new(25.0, 25.0, 25.0, 25.0));
        assert!(recs.is_empty());
    }

    #[test]
    fn test_tolerance_edge_holds() {
        let portfolio = UserPortfolio::new(dec!(30), dec!(20), dec!(25), dec!(25));
        let target = Allocation::new(25.0, 25.0, 25.0, 25.0);
        let recs = RecommendationEngine::default().recommend(&portfolio, &target);
        assert!(recs.iter().all(|r| r.action == Action::Hold));
    }

    #[test]
    fn test_custom_tolerance() {
        let portfolio = UserPortfolio::new(dec!(30), dec!(20), dec!(25), dec!(25));
        let target = Allocation::new(25.0, 25.0, 25.0, 25.0);
        let recs = RecommendationEngine::new(2.0).recommend(&portfolio, &target);
        assert_eq!(find(&recs, AssetClass::Stocks).action, Action::Sell);
        assert_eq!(find(&recs, AssetClass::Stocks).amount_delta, dec!(5));
        assert_eq!(find(&recs, AssetClass::Gold).action, Action::Buy);
        assert_eq!(find(&recs, AssetClass::Bonds).action, Action::Hold);
    }
}
