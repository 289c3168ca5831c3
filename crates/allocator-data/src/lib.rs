//! Market data sources for the allocator.
//!
//! Quote and weekly-history providers (Finnhub, Yahoo chart API), the
//! prioritized provider chain, offline sources, the in-memory market cache
//! and the ratio estimator with its fallback prices and plausibility checks.

mod cache;
mod chain;
mod csv_source;
mod estimator;
pub mod providers;
mod static_source;
mod symbols;

pub use cache::{MarketCache, MarketSnapshot, DEFAULT_CACHE_TIMEOUT_SECS};
pub use chain::ProviderChain;
pub use csv_source::CsvHistorySource;
pub use estimator::{
    estimate_ratios, validate_market_data, FallbackPrices, PriceOrigin, RatioEstimate,
    ValidationBounds,
};
pub use providers::{
    CandleRequest, Endpoint, FinnhubProvider, MarketDataProvider, ProviderCandles, ProviderQuote,
    ProxyRequest, YahooProvider,
};
pub use static_source::StaticSource;
pub use symbols::SymbolMap;

use allocator_core::error::DataError;
use allocator_core::traits::{HistorySource, QuoteSource};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Await all requests, concurrently when `delay` is zero, otherwise one by
/// one with `delay` between them.
async fn paced<F, T>(requests: Vec<F>, delay: Duration) -> Vec<T>
where
    F: Future<Output = T>,
{
    if delay.is_zero() {
        return join_all(requests).await;
    }
    let mut results = Vec::with_capacity(requests.len());
    for (i, request) in requests.into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(delay).await;
        }
        results.push(request.await);
    }
    results
}

/// Fetch one full market batch: quotes for the four assets and the
/// benchmarks, weekly history for the three ratio assets.
///
/// Per-symbol failures are logged and left out of the snapshot.
pub async fn fetch_snapshot(
    quotes: &dyn QuoteSource,
    history: &dyn HistorySource,
    symbols: &SymbolMap,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    request_delay: Duration,
) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::default();

    let asset_symbols = symbols.asset_symbols();
    let quote_results = paced(
        asset_symbols.iter().map(|s| quotes.get_quote(s)).collect(),
        request_delay,
    )
    .await;
    for (symbol, result) in asset_symbols.iter().zip(quote_results) {
        match result {
            Ok(quote) if quote.is_valid() => {
                snapshot.quotes.insert(symbol.to_string(), quote);
            }
            Ok(_) => warn!(symbol, "Discarding quote without a usable price"),
            Err(e) => warn!(symbol, error = %e, "Quote unavailable"),
        }
    }

    let history_symbols = symbols.history_symbols();
    let history_results = paced(
        history_symbols
            .iter()
            .map(|s| history.get_weekly_closes(s, from, to))
            .collect(),
        request_delay,
    )
    .await;
    for (symbol, result) in history_symbols.iter().zip(history_results) {
        match result {
            Ok(closes) if !closes.is_empty() => {
                snapshot.history.insert(symbol.to_string(), closes);
            }
            Ok(_) => warn!(symbol, "Empty weekly history"),
            Err(e) => warn!(symbol, error = %e, "Weekly history unavailable"),
        }
    }

    let benchmark_results = paced(
        symbols.benchmarks.iter().map(|s| quotes.get_quote(s)).collect(),
        request_delay,
    )
    .await;
    for (symbol, result) in symbols.benchmarks.iter().zip(benchmark_results) {
        match result {
            Ok(quote) if quote.is_valid() => {
                snapshot.benchmarks.insert(symbol.clone(), quote);
            }
            Ok(_) => {}
            Err(e) => warn!(symbol = %symbol, error = %e, "Benchmark unavailable"),
        }
    }

    snapshot
}

/// Reject a snapshot with no usable asset quote at all.
pub fn require_quotes(snapshot: &MarketSnapshot, symbols: &SymbolMap) -> Result<(), DataError> {
    let missing: Vec<String> = symbols
        .asset_symbols()
        .iter()
        .filter(|s| !snapshot.quotes.contains_key(**s))
        .map(|s| s.to_string())
        .collect();

    if missing.len() == symbols.asset_symbols().len() {
        Err(DataError::UpstreamUnavailable {
            symbol: missing.join(", "),
        })
    } else if !missing.is_empty() {
        Err(DataError::PartialData { missing })
    } else {
        Ok(())
    }
}
