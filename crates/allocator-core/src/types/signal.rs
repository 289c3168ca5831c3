//! Regime signals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which defensive asset the gold/bonds ratio favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InflationSignal {
    /// Gold/bonds above its average: inflationary regime
    Gold,
    /// Gold/bonds at or below its average: deflationary regime
    Bonds,
}

/// Whether the stocks/gold ratio says to hold equities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitSignal {
    KeepStocks,
    ExitStocks,
}

/// The two independent signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalPair {
    pub inflation: InflationSignal,
    pub exit: ExitSignal,
}

impl SignalPair {
    pub fn new(inflation: InflationSignal, exit: ExitSignal) -> Self {
        Self { inflation, exit }
    }

    pub fn is_inflation(&self) -> bool {
        self.inflation == InflationSignal::Gold
    }

    pub fn is_exit(&self) -> bool {
        self.exit == ExitSignal::ExitStocks
    }
}

impl Default for SignalPair {
    /// The calm state used when no market data is available.
    fn default() -> Self {
        Self {
            inflation: InflationSignal::Bonds,
            exit: ExitSignal::KeepStocks,
        }
    }
}

impl fmt::Display for InflationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InflationSignal::Gold => f.write_str("GOLD"),
            InflationSignal::Bonds => f.write_str("BONDS"),
        }
    }
}

impl fmt::Display for ExitSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitSignal::KeepStocks => f.write_str("KEEP_STOCKS"),
            ExitSignal::ExitStocks => f.write_str("EXIT_STOCKS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_calm() {
        let signals = SignalPair::default();
        assert!(!signals.is_inflation());
        assert!(!signals.is_exit());
    }

    #[test]
    fn test_serde_names() {
        let signals = SignalPair::new(InflationSignal::Gold, ExitSignal::ExitStocks);
        let json = serde_json::to_string(&signals).unwrap();
        assert_eq!(json, r#"{"inflation":"GOLD","exit":"EXIT_STOCKS"}"#);
    }
}
