//! Finnhub REST provider.

use allocator_core::error::DataError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    http_error, CandleRequest, Endpoint, MarketDataProvider, ProviderCandles, ProviderQuote,
    USER_AGENT,
};

pub const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Finnhub client. Requests without an API key fail immediately so the
/// chain can move on to the next provider.
pub struct FinnhubProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FinnhubProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<T, DataError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DataError::Configuration("FINNHUB_API_KEY not set".to_string()))?;

        let url = format!("{}/{}", self.base_url, endpoint.path());
        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("token", api_key)])
            .send()
            .await
            .map_err(http_error)?;

        if !resp.status().is_success() {
            return Err(DataError::Http(format!("Finnhub returned {}", resp.status())));
        }

        resp.json::<T>()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn name(&self) -> &str {
        "finnhub"
    }

    async fn quote(&self, symbol: &str) -> Result<ProviderQuote, DataError> {
        let quote: ProviderQuote = self
            .get(Endpoint::Quote, &[("symbol", symbol.to_string())])
            .await?;
        if !quote.is_valid() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        debug!(symbol, price = quote.c, "Finnhub quote");
        Ok(quote)
    }

    async fn candles(
        &self,
        symbol: &str,
        request: &CandleRequest,
    ) -> Result<ProviderCandles, DataError> {
        let candles: ProviderCandles = self
            .get(
                Endpoint::StockCandle,
                &[
                    ("symbol", symbol.to_string()),
                    ("resolution", request.resolution.clone()),
                    ("from", request.from.to_string()),
                    ("to", request.to.to_string()),
                ],
            )
            .await?;
        if !candles.is_valid() {
            return Err(DataError::NoDataAvailable);
        }
        debug!(symbol, closes = candles.c.len(), "Finnhub candles");
        Ok(candles)
    }
}
