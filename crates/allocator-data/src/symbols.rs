//! Instrument symbols per asset class.

use allocator_core::types::AssetClass;
use serde::{Deserialize, Serialize};

/// Which ticker stands for each asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolMap {
    /// World equity ETF
    pub stocks: String,
    /// Gold ETF or spot symbol
    pub gold: String,
    /// Long-dated government bond ETF
    pub bonds: String,
    /// Short-dated government bond ETF used as cash
    pub cash: String,
    /// Reference indices shown alongside the allocation
    pub benchmarks: Vec<String>,
    /// Benchmark used as the cyclical leg of the diffusion-index proxy
    pub cyclical_benchmark: String,
}

impl Default for SymbolMap {
    fn default() -> Self {
        Self {
            stocks: "URTH".to_string(),
            gold: "GLD".to_string(),
            bonds: "TLT".to_string(),
            cash: "SHY".to_string(),
            benchmarks: vec![
                "SPY".to_string(),
                "EWQ".to_string(),
                "EWG".to_string(),
                "BITO".to_string(),
            ],
            cyclical_benchmark: "SPY".to_string(),
        }
    }
}

impl SymbolMap {
    pub fn symbol(&self, asset: AssetClass) -> &str {
        match asset {
            AssetClass::Stocks => &self.stocks,
            AssetClass::Gold => &self.gold,
            AssetClass::Bonds => &self.bonds,
            AssetClass::Cash => &self.cash,
        }
    }

    /// Symbols quoted every refresh, in asset order.
    pub fn asset_symbols(&self) -> [&str; 4] {
        [&self.stocks, &self.gold, &self.bonds, &self.cash]
    }

    /// Symbols whose weekly history feeds the moving averages.
    pub fn history_symbols(&self) -> [&str; 3] {
        [&self.gold, &self.bonds, &self.stocks]
    }

    /// Whether gold is tracked through the GLD ETF rather than spot.
    pub fn gold_is_etf(&self) -> bool {
        self.gold.eq_ignore_ascii_case("GLD")
    }
}
