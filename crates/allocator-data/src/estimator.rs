//! Ratio estimation with graceful fallback.
//!
//! Each asset price comes from the live quote, else the last weekly close,
//! else a fixed reference price. The estimate always succeeds; what was
//! substituted is reported alongside.

use allocator_core::error::DataError;
use allocator_core::types::{Allocation, AssetClass, RatioPair, STOCKS_GOLD_SCALE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::MarketCache;
use crate::symbols::SymbolMap;

/// Reference prices used when neither a quote nor history is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPrices {
    pub stocks: f64,
    pub gold: f64,
    pub bonds: f64,
    pub cash: f64,
}

impl Default for FallbackPrices {
    fn default() -> Self {
        Self {
            stocks: 60.0,
            gold: 200.0,
            bonds: 85.0,
            cash: 100.0,
        }
    }
}

impl FallbackPrices {
    pub fn get(&self, asset: AssetClass) -> f64 {
        match asset {
            AssetClass::Stocks => self.stocks,
            AssetClass::Gold => self.gold,
            AssetClass::Bonds => self.bonds,
            AssetClass::Cash => self.cash,
        }
    }
}

/// Where a resolved price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceOrigin {
    Quote,
    History,
    Fallback,
}

/// Prices and ratios for one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioEstimate {
    /// Resolved price per asset, reusing the allocation layout
    pub prices: Allocation,
    pub origins: [(AssetClass, PriceOrigin); 4],
    pub ratios: RatioPair,
}

impl RatioEstimate {
    pub fn price(&self, asset: AssetClass) -> f64 {
        self.prices.get(asset)
    }

    pub fn origin(&self, asset: AssetClass) -> PriceOrigin {
        self.origins
            .iter()
            .find(|(a, _)| *a == asset)
            .map(|(_, origin)| *origin)
            .unwrap_or(PriceOrigin::Fallback)
    }

    /// Assets priced from the fixed reference table.
    pub fn substituted(&self) -> Vec<AssetClass> {
        self.origins
            .iter()
            .filter(|(_, origin)| *origin == PriceOrigin::Fallback)
            .map(|(asset, _)| *asset)
            .collect()
    }

    /// No live or historical price for any asset.
    pub fn is_fully_substituted(&self) -> bool {
        self.origins.iter().all(|(_, o)| *o == PriceOrigin::Fallback)
    }

    /// Stocks/gold from live quotes only.
    pub fn live_stocks_gold(&self) -> Option<f64> {
        let live = |a| self.origin(a) == PriceOrigin::Quote;
        let gold = self.price(AssetClass::Gold);
        (live(AssetClass::Stocks) && live(AssetClass::Gold) && gold > 0.0)
            .then(|| self.price(AssetClass::Stocks) / (gold / STOCKS_GOLD_SCALE))
    }

    /// Stocks price over bonds price, the valuation proxy.
    pub fn stocks_bonds_ratio(&self) -> f64 {
        let bonds = self.price(AssetClass::Bonds);
        if bonds > 0.0 {
            self.price(AssetClass::Stocks) / bonds
        } else {
            0.0
        }
    }

    /// Missing-input errors for every substituted asset.
    pub fn missing_inputs(&self, symbols: &SymbolMap) -> Vec<DataError> {
        self.substituted()
            .into_iter()
            .map(|asset| DataError::MissingInput {
                symbol: symbols.symbol(asset).to_string(),
            })
            .collect()
    }
}

/// Resolve prices for the four assets and derive both ratios.
pub fn estimate_ratios(
    cache: &MarketCache,
    symbols: &SymbolMap,
    fallback: &FallbackPrices,
) -> RatioEstimate {
    let resolve = |asset: AssetClass| -> (f64, PriceOrigin) {
        let symbol = symbols.symbol(asset);
        if let Some(price) = cache
            .quote(symbol)
            .map(|q| q.price)
            .filter(|p| p.is_finite() && *p > 0.0)
        {
            return (price, PriceOrigin::Quote);
        }
        if let Some(price) = cache
            .history(symbol)
            .and_then(|closes| closes.last().copied())
            .filter(|p| p.is_finite() && *p > 0.0)
        {
            return (price, PriceOrigin::History);
        }
        warn!(symbol, fallback = fallback.get(asset), "No price data, using reference price");
        (fallback.get(asset), PriceOrigin::Fallback)
    };

    let resolved = AssetClass::ALL.map(|asset| (asset, resolve(asset)));
    let prices = Allocation::from_fn(|asset| {
        resolved
            .iter()
            .find(|(a, _)| *a == asset)
            .map(|(_, (price, _))| *price)
            .unwrap_or(0.0)
    });
    let origins = resolved.map(|(asset, (_, origin))| (asset, origin));
    let ratios = RatioPair::from_prices(prices.gold, prices.bonds, prices.stocks);

    debug!(
        gold_bonds = format!("{:.3}", ratios.gold_bonds),
        stocks_gold = format!("{:.2}", ratios.stocks_gold),
        "Ratios estimated"
    );

    RatioEstimate {
        prices,
        origins,
        ratios,
    }
}

/// Plausibility ranges for prices and ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationBounds {
    pub gold_bonds: [f64; 2],
    pub stocks_gold: [f64; 2],
    /// Gold price range when tracked through the GLD ETF
    pub gold_etf: [f64; 2],
    /// Gold price range for spot quotes
    pub gold_spot: [f64; 2],
}

impl Default for ValidationBounds {
    fn default() -> Self {
        Self {
            gold_bonds: [1.0, 6.0],
            stocks_gold: [10.0, 80.0],
            gold_etf: [150.0, 400.0],
            gold_spot: [1500.0, 3500.0],
        }
    }
}

/// Out-of-bounds warnings. Values are never altered.
pub fn validate_market_data(
    estimate: &RatioEstimate,
    bounds: &ValidationBounds,
    gold_is_etf: bool,
) -> Vec<DataError> {
    let gold_range = if gold_is_etf { bounds.gold_etf } else { bounds.gold_spot };
    let checks = [
        ("gold/bonds ratio", estimate.ratios.gold_bonds, bounds.gold_bonds),
        ("stocks/gold ratio", estimate.ratios.stocks_gold, bounds.stocks_gold),
        ("gold price", estimate.price(AssetClass::Gold), gold_range),
    ];

    let warnings: Vec<DataError> = checks
        .into_iter()
        .filter(|(_, value, [low, high])| value < low || value > high)
        .map(|(field, value, [low, high])| DataError::OutOfBounds {
            field: field.to_string(),
            value,
            low,
            high,
        })
        .collect();

    for warning in &warnings {
        warn!(%warning, "Market data outside plausible range");
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MarketSnapshot;
    use allocator_core::types::Quote;
    use chrono::Utc;

    fn quote(symbol: &str, price: f64) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price,
            change: 0.0,
            change_percent: 0.0,
            timestamp: 0,
        }
    }

    fn cache_with(quotes: &[(&str, f64)], history: &[(&str, Vec<f64>)]) -> MarketCache {
        let mut snapshot = MarketSnapshot::default();
        for (s, p) in quotes {
            snapshot.quotes.insert(s.to_string(), quote(s, *p));
        }
        for (s, closes) in history {
            snapshot.history.insert(s.to_string(), closes.clone());
        }
        let mut cache = MarketCache::default();
        cache.replace(snapshot, Utc::now());
        cache
    }

    #[test]
    fn test_quote_then_history_then_fallback() {
        let cache = cache_with(&[("GLD", 240.0)], &[("TLT", vec![80.0, 96.0])]);
        let estimate = estimate_ratios(&cache, &SymbolMap::default(), &FallbackPrices::default());

        assert_eq!(estimate.origin(AssetClass::Gold), PriceOrigin::Quote);
        assert_eq!(estimate.origin(AssetClass::Bonds), PriceOrigin::History);
        assert_eq!(estimate.origin(AssetClass::Stocks), PriceOrigin::Fallback);
        assert_eq!(estimate.substituted(), vec![AssetClass::Stocks, AssetClass::Cash]);

        assert!((estimate.ratios.gold_bonds - 2.5).abs() < 1e-12);
        assert!((estimate.ratios.stocks_gold - 25.0).abs() < 1e-12);
        assert!(estimate.live_stocks_gold().is_none());
    }

    #[test]
    fn test_invalid_quote_is_ignored() {
        let cache = cache_with(&[("GLD", 0.0)], &[]);
        let estimate = estimate_ratios(&cache, &SymbolMap::default(), &FallbackPrices::default());
        assert_eq!(estimate.origin(AssetClass::Gold), PriceOrigin::Fallback);
        assert!(estimate.is_fully_substituted());
        assert_eq!(estimate.missing_inputs(&SymbolMap::default()).len(), 4);
    }

    #[test]
    fn test_live_ratio() {
        let cache = cache_with(&[("GLD", 200.0), ("URTH", 50.0)], &[]);
        let estimate = estimate_ratios(&cache, &SymbolMap::default(), &FallbackPrices::default());
        assert_eq!(estimate.live_stocks_gold(), Some(25.0));
    }

    #[test]
    fn test_out_of_bounds_warnings() {
        let cache = cache_with(&[("GLD", 1000.0), ("TLT", 100.0), ("URTH", 50.0)], &[]);
        let estimate = estimate_ratios(&cache, &SymbolMap::default(), &FallbackPrices::default());
        let warnings = validate_market_data(&estimate, &ValidationBounds::default(), true);

        // gold/bonds 10 and gold 1000 out of range, stocks/gold 5 too
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().all(DataError::is_recoverable));

        let spot = validate_market_data(&estimate, &ValidationBounds::default(), false);
        assert_eq!(spot.len(), 3);
    }

    #[test]
    fn test_reference_prices_are_plausible() {
        let cache = MarketCache::default();
        let estimate = estimate_ratios(&cache, &SymbolMap::default(), &FallbackPrices::default());
        assert!(validate_market_data(&estimate, &ValidationBounds::default(), true).is_empty());
    }
}
