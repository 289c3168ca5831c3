//! In-memory quote and history source for offline runs.

use allocator_core::error::DataError;
use allocator_core::traits::{HistorySource, QuoteSource};
use allocator_core::types::Quote;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Fixed quotes and weekly closes, keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    quotes: HashMap<String, Quote>,
    history: HashMap<String, Vec<f64>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quote with the given daily change in percent.
    pub fn with_price(mut self, symbol: &str, price: f64, change_percent: f64) -> Self {
        let previous = price / (1.0 + change_percent / 100.0);
        self.quotes.insert(
            symbol.to_string(),
            Quote {
                symbol: symbol.to_string(),
                price,
                change: price - previous,
                change_percent,
                timestamp: Utc::now().timestamp_millis(),
            },
        );
        self
    }

    pub fn with_history(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.history.insert(symbol.to_string(), closes);
        self
    }
}

#[async_trait]
impl QuoteSource for StaticSource {
    async fn get_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::MissingInput {
                symbol: symbol.to_string(),
            })
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[async_trait]
impl HistorySource for StaticSource {
    async fn get_weekly_closes(
        &self,
        symbol: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<f64>, DataError> {
        self.history
            .get(symbol)
            .cloned()
            .ok_or(DataError::NoDataAvailable)
    }
}
