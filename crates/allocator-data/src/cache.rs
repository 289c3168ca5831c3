//! In-memory market cache.

use allocator_core::types::Quote;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_CACHE_TIMEOUT_SECS: i64 = 300;

/// One completed fetch batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub quotes: HashMap<String, Quote>,
    /// Weekly closes, oldest first
    pub history: HashMap<String, Vec<f64>>,
    pub benchmarks: HashMap<String, Quote>,
}

impl MarketSnapshot {
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty() && self.history.is_empty() && self.benchmarks.is_empty()
    }
}

/// Latest market data, replaced batch by batch.
#[derive(Debug, Clone)]
pub struct MarketCache {
    snapshot: MarketSnapshot,
    last_update: Option<DateTime<Utc>>,
    timeout: Duration,
}

impl Default for MarketCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_CACHE_TIMEOUT_SECS))
    }
}

impl MarketCache {
    pub fn new(timeout: Duration) -> Self {
        Self {
            snapshot: MarketSnapshot::default(),
            last_update: None,
            timeout,
        }
    }

    /// Install a completed batch.
    pub fn replace(&mut self, snapshot: MarketSnapshot, at: DateTime<Utc>) {
        self.snapshot = snapshot;
        self.last_update = Some(at);
    }

    pub fn snapshot(&self) -> &MarketSnapshot {
        &self.snapshot
    }

    pub fn quote(&self, symbol: &str) -> Option<&Quote> {
        self.snapshot.quotes.get(symbol)
    }

    pub fn history(&self, symbol: &str) -> Option<&[f64]> {
        self.snapshot.history.get(symbol).map(Vec::as_slice)
    }

    pub fn benchmark(&self, symbol: &str) -> Option<&Quote> {
        self.snapshot.benchmarks.get(symbol)
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Never filled, or older than the timeout.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.last_update {
            Some(at) => now - at > self.timeout,
            None => true,
        }
    }

    pub fn clear(&mut self) {
        self.snapshot = MarketSnapshot::default();
        self.last_update = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str, price: f64) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price,
            change: 0.0,
            change_percent: 0.0,
            timestamp: 0,
        }
    }

    #[test]
    fn test_staleness() {
        let mut cache = MarketCache::default();
        let t0 = Utc::now();
        assert!(cache.is_stale(t0));

        cache.replace(MarketSnapshot::default(), t0);
        assert!(!cache.is_stale(t0 + Duration::seconds(299)));
        assert!(cache.is_stale(t0 + Duration::seconds(301)));

        cache.clear();
        assert!(cache.last_update().is_none());
    }

    #[test]
    fn test_replace_discards_previous_batch() {
        let mut cache = MarketCache::default();
        let mut first = MarketSnapshot::default();
        first.quotes.insert("GLD".to_string(), quote("GLD", 200.0));
        cache.replace(first, Utc::now());

        let mut second = MarketSnapshot::default();
        second.quotes.insert("TLT".to_string(), quote("TLT", 85.0));
        second.history.insert("TLT".to_string(), vec![84.0, 85.0]);
        cache.replace(second, Utc::now());

        assert!(cache.quote("GLD").is_none());
        assert_eq!(cache.quote("TLT").map(|q| q.price), Some(85.0));
        assert_eq!(cache.history("TLT"), Some(&[84.0, 85.0][..]));
    }
}
