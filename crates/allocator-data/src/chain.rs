//! Prioritized provider chain.

use allocator_core::error::DataError;
use allocator_core::traits::{HistorySource, QuoteSource};
use allocator_core::types::Quote;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::providers::{
    CandleRequest, Endpoint, MarketDataProvider, ProviderCandles, ProviderQuote, ProxyRequest,
};

/// Providers tried in order; the first success wins.
pub struct ProviderChain {
    providers: Vec<Box<dyn MarketDataProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn MarketDataProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn quote(&self, symbol: &str) -> Result<(ProviderQuote, &str), DataError> {
        for provider in &self.providers {
            match provider.quote(symbol).await {
                Ok(quote) => return Ok((quote, provider.name())),
                Err(e) => {
                    warn!(provider = provider.name(), symbol, error = %e, "Quote provider failed")
                }
            }
        }
        Err(DataError::UpstreamUnavailable {
            symbol: symbol.to_string(),
        })
    }

    pub async fn candles(
        &self,
        symbol: &str,
        request: &CandleRequest,
    ) -> Result<(ProviderCandles, &str), DataError> {
        for provider in &self.providers {
            match provider.candles(symbol, request).await {
                Ok(candles) => return Ok((candles, provider.name())),
                Err(e) => {
                    warn!(provider = provider.name(), symbol, error = %e, "Candle provider failed")
                }
            }
        }
        Err(DataError::UpstreamUnavailable {
            symbol: symbol.to_string(),
        })
    }

    /// Answer a passthrough request with provider-shaped JSON.
    pub async fn passthrough(
        &self,
        request: &ProxyRequest,
    ) -> Result<serde_json::Value, DataError> {
        let body = match (request.endpoint, &request.candle) {
            (Endpoint::Quote, _) => serde_json::to_value(self.quote(&request.symbol).await?.0),
            (Endpoint::StockCandle, Some(candle)) => {
                serde_json::to_value(self.candles(&request.symbol, candle).await?.0)
            }
            (Endpoint::StockCandle, None) => {
                return Err(DataError::MissingParameter("resolution".to_string()))
            }
        };
        body.map_err(|e| DataError::Internal(e.to_string()))
    }

    /// HTTP status and JSON error body for a failed passthrough.
    pub fn error_response(error: &DataError) -> (u16, serde_json::Value) {
        match error {
            DataError::EndpointNotAllowed(_)
            | DataError::MissingParameter(_)
            | DataError::Parse(_) => {
                (400, json!({ "error": error.to_string() }))
            }
            DataError::SymbolNotFound(_) | DataError::NoDataAvailable => {
                (404, json!({ "error": error.to_string() }))
            }
            _ => (
                500,
                json!({
                    "error": "Failed to fetch market data",
                    "timestamp": Utc::now().to_rfc3339(),
                }),
            ),
        }
    }
}

#[async_trait]
impl QuoteSource for ProviderChain {
    async fn get_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        let (quote, provider) = self.quote(symbol).await?;
        debug!(symbol, provider, price = quote.c, "Quote resolved");
        Ok(quote.into_quote(symbol, Utc::now().timestamp_millis()))
    }

    fn name(&self) -> &str {
        "provider-chain"
    }
}

#[async_trait]
impl HistorySource for ProviderChain {
    async fn get_weekly_closes(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<f64>, DataError> {
        let request = CandleRequest::weekly(from.timestamp(), to.timestamp());
        let (candles, provider) = self.candles(symbol, &request).await?;
        debug!(symbol, provider, closes = candles.c.len(), "Weekly history resolved");
        Ok(candles.c)
    }
}
