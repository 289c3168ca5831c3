//! Configuration structures.

use allocator_core::error::AllocatorError;
use allocator_core::types::{
    AllocationMode, MovingAverages, REFERENCE_GOLD_BONDS_MA, REFERENCE_STOCKS_GOLD_MA,
};
use allocator_data::providers::{FINNHUB_BASE_URL, YAHOO_BASE_URL};
use allocator_data::{FallbackPrices, SymbolMap, ValidationBounds};
use allocator_risk::{RebalanceCalendar, TransitionConfig, DEFAULT_TOLERANCE};
use allocator_strategy::GrowthPolicy;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub allocation: AllocationSettings,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub growth: GrowthPolicy,
    #[serde(default)]
    pub rebalance: RebalanceCalendar,
    #[serde(default)]
    pub market: MarketSettings,
    #[serde(default)]
    pub validation: ValidationBounds,
}

impl AppConfig {
    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, AllocatorError> {
        toml::to_string_pretty(self).map_err(|e| AllocatorError::Serialization(e.to_string()))
    }

    /// Check value ranges the decision pipeline relies on.
    pub fn validate(&self) -> Result<(), AllocatorError> {
        let mut problems = Vec::new();

        if self.allocation.tolerance < 0.0 {
            problems.push(format!(
                "allocation.tolerance must be >= 0, got {}",
                self.allocation.tolerance
            ));
        }

        let t = &self.transition;
        for (name, speed) in [
            ("exit_speed", t.exit_speed),
            ("stagflation_speed", t.stagflation_speed),
            ("default_speed", t.default_speed),
        ] {
            if !(speed > 0.0 && speed <= 1.0) {
                problems.push(format!("transition.{name} must be in (0, 1], got {speed}"));
            }
        }
        if t.max_change_per_cycle <= 0.0 {
            problems.push("transition.max_change_per_cycle must be positive".to_string());
        }

        let g = &self.growth;
        if !(0.0..=1.0).contains(&g.threshold) {
            problems.push(format!("growth.threshold must be in [0, 1], got {}", g.threshold));
        }
        if g.max_score() <= 0.0 {
            problems.push("growth weights must not all be zero".to_string());
        }
        let weights = [
            g.relative_performance_weight,
            g.valuation_weight,
            g.low_volatility_weight,
            g.keep_stocks_weight,
            g.yield_curve_weight,
            g.diffusion_index_weight,
            g.economic_cycle_weight,
        ];
        if weights.iter().any(|w| *w < 0.0) {
            problems.push("growth weights must be non-negative".to_string());
        }

        if self.rebalance.months.is_empty()
            || self.rebalance.months.iter().any(|m| !(1..=12).contains(m))
        {
            problems.push("rebalance.months must list months between 1 and 12".to_string());
        }
        if !(1..=28).contains(&self.rebalance.day) {
            problems.push("rebalance.day must be between 1 and 28".to_string());
        }

        let m = &self.market;
        for (name, price) in [
            ("stocks", m.fallback_prices.stocks),
            ("gold", m.fallback_prices.gold),
            ("bonds", m.fallback_prices.bonds),
            ("cash", m.fallback_prices.cash),
        ] {
            if price <= 0.0 {
                problems.push(format!("market.fallback_prices.{name} must be positive"));
            }
        }
        if m.reference_gold_bonds_ma <= 0.0 || m.reference_stocks_gold_ma <= 0.0 {
            problems.push("market reference moving averages must be positive".to_string());
        }
        if m.refresh_interval_secs == 0 {
            problems.push("market.refresh_interval_secs must be positive".to_string());
        }

        let v = &self.validation;
        for (name, [low, high]) in [
            ("gold_bonds", v.gold_bonds),
            ("stocks_gold", v.stocks_gold),
            ("gold_etf", v.gold_etf),
            ("gold_spot", v.gold_spot),
        ] {
            if low >= high {
                problems.push(format!("validation.{name} lower bound must be below upper bound"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AllocatorError::Config(problems.join("; ")))
        }
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "ratio-allocator".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Allocation mode and recommendation tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationSettings {
    pub mode: AllocationMode,
    /// HOLD band in percentage points
    pub tolerance: f64,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            mode: AllocationMode::Simple,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Where the 7-year moving averages come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AverageSource {
    /// Fixed reference constants
    Reference,
    /// Mean ratio over fetched weekly history, reference constants as fallback
    #[default]
    Historical,
    /// Synthetic monthly history driven by the cycle calendar
    Synthetic,
}

/// Market data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    pub symbols: SymbolMap,
    pub fallback_prices: FallbackPrices,
    pub reference_gold_bonds_ma: f64,
    pub reference_stocks_gold_ma: f64,
    pub average_source: AverageSource,
    /// Years of weekly history requested for the moving averages
    pub history_years: u32,
    pub refresh_interval_secs: u64,
    pub cache_timeout_secs: i64,
    /// Pause between upstream requests
    pub request_delay_ms: u64,
    pub finnhub_base_url: String,
    pub yahoo_base_url: String,
    /// Environment variable holding the Finnhub API key
    pub api_key_env: String,
    /// Directory of `<SYMBOL>.csv` weekly closes used offline
    pub history_dir: Option<String>,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            symbols: SymbolMap::default(),
            fallback_prices: FallbackPrices::default(),
            reference_gold_bonds_ma: REFERENCE_GOLD_BONDS_MA,
            reference_stocks_gold_ma: REFERENCE_STOCKS_GOLD_MA,
            average_source: AverageSource::default(),
            history_years: 7,
            refresh_interval_secs: 300,
            cache_timeout_secs: 300,
            request_delay_ms: 100,
            finnhub_base_url: FINNHUB_BASE_URL.to_string(),
            yahoo_base_url: YAHOO_BASE_URL.to_string(),
            api_key_env: "FINNHUB_API_KEY".to_string(),
            history_dir: None,
        }
    }
}

impl MarketSettings {
    pub fn reference_averages(&self) -> MovingAverages {
        MovingAverages::new(self.reference_gold_bonds_ma, self.reference_stocks_gold_ma)
    }
}
