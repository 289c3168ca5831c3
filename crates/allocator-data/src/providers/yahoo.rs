//! Yahoo Finance chart API, normalized to the Finnhub shape.

use allocator_core::error::DataError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{
    http_error, CandleRequest, MarketDataProvider, ProviderCandles, ProviderQuote, USER_AGENT,
};

pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    regular_market_open: Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
}

fn first(values: &[Option<f64>]) -> Option<f64> {
    values.first().copied().flatten().filter(|v| *v > 0.0)
}

impl ChartResponse {
    fn into_result(self) -> Result<ChartResult, DataError> {
        self.chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| DataError::Parse("Invalid Yahoo Finance chart format".to_string()))
    }
}

impl ChartResult {
    fn series(&self) -> Option<&ChartQuote> {
        self.indicators.quote.first()
    }

    fn to_quote(&self) -> Result<ProviderQuote, DataError> {
        let empty = ChartQuote::default();
        let series = self.series().unwrap_or(&empty);
        let meta = &self.meta;

        let price = meta
            .regular_market_price
            .filter(|p| *p > 0.0)
            .or_else(|| first(&series.close))
            .unwrap_or(0.0);
        if !(price.is_finite() && price > 0.0) {
            return Err(DataError::Parse(format!("Invalid Yahoo price {price}")));
        }
        let previous_close = meta
            .chart_previous_close
            .filter(|p| *p > 0.0)
            .or_else(|| first(&series.close))
            .unwrap_or(0.0);

        let change_percent = if previous_close > 0.0 {
            (price - previous_close) / previous_close * 100.0
        } else {
            0.0
        };

        Ok(ProviderQuote {
            c: price,
            d: Some(price - previous_close),
            dp: Some(change_percent),
            h: meta.regular_market_day_high.or_else(|| first(&series.high)).unwrap_or(price),
            l: meta.regular_market_day_low.or_else(|| first(&series.low)).unwrap_or(price),
            o: meta.regular_market_open.or_else(|| first(&series.open)).unwrap_or(price),
            pc: previous_close,
            t: Utc::now().timestamp(),
        })
    }

    /// Closes paired with timestamps; null closes are dropped.
    fn to_candles(&self) -> ProviderCandles {
        let mut c = Vec::new();
        let mut t = Vec::new();
        if let Some(series) = self.series() {
            for (close, ts) in series.close.iter().zip(&self.timestamp) {
                if let Some(close) = close.filter(|v| v.is_finite() && *v > 0.0) {
                    c.push(close);
                    t.push(*ts);
                }
            }
        }
        let s = if c.is_empty() { "no_data" } else { "ok" };
        ProviderCandles { s: s.to_string(), c, t }
    }
}

/// Keyless fallback provider.
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn chart(
        &self,
        symbol: &str,
        params: &[(&str, String)],
    ) -> Result<ChartResult, DataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(http_error)?;

        if !resp.status().is_success() {
            return Err(DataError::Http(format!("Yahoo returned {}", resp.status())));
        }

        resp.json::<ChartResponse>()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))?
            .into_result()
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn quote(&self, symbol: &str) -> Result<ProviderQuote, DataError> {
        let result = self
            .chart(
                symbol,
                &[("interval", "1d".to_string()), ("range", "1d".to_string())],
            )
            .await?;
        let quote = result.to_quote()?;
        debug!(symbol, price = quote.c, "Yahoo quote normalized");
        Ok(quote)
    }

    async fn candles(
        &self,
        symbol: &str,
        request: &CandleRequest,
    ) -> Result<ProviderCandles, DataError> {
        let result = self
            .chart(
                symbol,
                &[
                    ("interval", "1wk".to_string()),
                    ("period1", request.from.to_string()),
                    ("period2", request.to.to_string()),
                ],
            )
            .await?;
        let candles = result.to_candles();
        if !candles.is_valid() {
            return Err(DataError::NoDataAvailable);
        }
        debug!(symbol, closes = candles.c.len(), "Yahoo candles normalized");
        Ok(candles)
    }
}
