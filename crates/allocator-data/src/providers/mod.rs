//! Upstream quote providers.
//!
//! Every provider answers in the Finnhub wire shape: a quote
//! `{c, d, dp, h, l, o, pc, t}` and candles `{s, c, t}`. Providers with a
//! different native format normalize into it.

mod finnhub;
mod yahoo;

pub use finnhub::{FinnhubProvider, FINNHUB_BASE_URL};
pub use yahoo::{YahooProvider, YAHOO_BASE_URL};

use allocator_core::error::DataError;
use allocator_core::types::Quote;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// User agent sent to upstream APIs.
pub const USER_AGENT: &str = concat!("ratio-allocator/", env!("CARGO_PKG_VERSION"));

/// Allowed upstream endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Quote,
    StockCandle,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Quote => "quote",
            Endpoint::StockCandle => "stock/candle",
        }
    }

    /// Parse against the allow-list.
    pub fn parse(value: &str) -> Result<Self, DataError> {
        match value {
            "quote" => Ok(Endpoint::Quote),
            "stock/candle" => Ok(Endpoint::StockCandle),
            other => Err(DataError::EndpointNotAllowed(other.to_string())),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Parameters of a candle request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleRequest {
    /// Finnhub resolution code, `W` for weekly
    pub resolution: String,
    /// Range start (Unix seconds)
    pub from: i64,
    /// Range end (Unix seconds)
    pub to: i64,
}

impl CandleRequest {
    pub fn weekly(from: i64, to: i64) -> Self {
        Self {
            resolution: "W".to_string(),
            from,
            to,
        }
    }
}

/// A validated passthrough request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub endpoint: Endpoint,
    pub symbol: String,
    /// Present for candle requests only
    pub candle: Option<CandleRequest>,
}

impl ProxyRequest {
    /// Validate raw query parameters.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, DataError> {
        let endpoint = query
            .get("endpoint")
            .ok_or_else(|| DataError::MissingParameter("endpoint".to_string()))?;
        let symbol = query
            .get("symbol")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DataError::MissingParameter("symbol".to_string()))?;
        let endpoint = Endpoint::parse(endpoint)?;

        let candle = match endpoint {
            Endpoint::Quote => None,
            Endpoint::StockCandle => {
                let param = |name: &str| {
                    query
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| DataError::MissingParameter(name.to_string()))
                };
                let epoch = |name: &str| -> Result<i64, DataError> {
                    param(name)?
                        .parse()
                        .map_err(|_| DataError::Parse(format!("{name} is not a Unix timestamp")))
                };
                Some(CandleRequest {
                    resolution: param("resolution")?.clone(),
                    from: epoch("from")?,
                    to: epoch("to")?,
                })
            }
        };

        Ok(Self {
            endpoint,
            symbol: symbol.clone(),
            candle,
        })
    }
}

/// Quote in the Finnhub wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderQuote {
    /// Current price
    pub c: f64,
    /// Change
    #[serde(default)]
    pub d: Option<f64>,
    /// Change percent
    #[serde(default)]
    pub dp: Option<f64>,
    #[serde(default)]
    pub h: f64,
    #[serde(default)]
    pub l: f64,
    #[serde(default)]
    pub o: f64,
    /// Previous close
    #[serde(default)]
    pub pc: f64,
    /// Unix seconds
    #[serde(default)]
    pub t: i64,
}

impl ProviderQuote {
    pub fn is_valid(&self) -> bool {
        self.c.is_finite() && self.c > 0.0
    }

    pub fn into_quote(self, symbol: &str, fetched_at_ms: i64) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price: self.c,
            change: self.d.unwrap_or(0.0),
            change_percent: self.dp.unwrap_or(0.0),
            timestamp: fetched_at_ms,
        }
    }
}

/// Candles in the Finnhub wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCandles {
    /// Status, `ok` on success
    pub s: String,
    /// Closing prices
    #[serde(default)]
    pub c: Vec<f64>,
    /// Unix seconds per close
    #[serde(default)]
    pub t: Vec<i64>,
}

impl ProviderCandles {
    pub fn is_valid(&self) -> bool {
        self.s == "ok" && !self.c.is_empty()
    }
}

/// An upstream market data API.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Latest quote; an invalid price is an error.
    async fn quote(&self, symbol: &str) -> Result<ProviderQuote, DataError>;

    /// Candles for the range; an empty or non-ok answer is an error.
    async fn candles(
        &self,
        symbol: &str,
        request: &CandleRequest,
    ) -> Result<ProviderCandles, DataError>;
}

pub(crate) fn http_error(err: reqwest::Error) -> DataError {
    DataError::Http(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_quote_request() {
        let req =
            ProxyRequest::from_query(&query(&[("endpoint", "quote"), ("symbol", "GLD")])).unwrap();
        assert_eq!(req.endpoint, Endpoint::Quote);
        assert_eq!(req.symbol, "GLD");
        assert!(req.candle.is_none());
    }

    #[test]
    fn test_endpoint_allow_list() {
        let err =
            ProxyRequest::from_query(&query(&[("endpoint", "stock/profile2"), ("symbol", "GLD")]))
                .unwrap_err();
        assert_eq!(err, DataError::EndpointNotAllowed("stock/profile2".to_string()));
    }

    #[test]
    fn test_missing_parameters() {
        let err = ProxyRequest::from_query(&query(&[("endpoint", "quote")])).unwrap_err();
        assert_eq!(err, DataError::MissingParameter("symbol".to_string()));

        let err = ProxyRequest::from_query(&query(&[
            ("endpoint", "stock/candle"),
            ("symbol", "TLT"),
            ("resolution", "W"),
            ("from", "100"),
        ]))
        .unwrap_err();
        assert_eq!(err, DataError::MissingParameter("to".to_string()));
    }

    #[test]
    fn test_candle_request() {
        let req = ProxyRequest::from_query(&query(&[
            ("endpoint", "stock/candle"),
            ("symbol", "TLT"),
            ("resolution", "W"),
            ("from", "100"),
            ("to", "200"),
        ]))
        .unwrap();
        assert_eq!(req.candle, Some(CandleRequest::weekly(100, 200)));
    }

    #[test]
    fn test_quote_wire_shape() {
        let quote: ProviderQuote =
            serde_json::from_str(
                r#"{"c":201.5,"d":1.5,"dp":0.75,"h":202,"l":199,"o":200,"pc":200,"t":1700000000}"#,
            )
            .unwrap();
        assert!(quote.is_valid());
        let quote = quote.into_quote("GLD", 1_700_000_000_000);
        assert_eq!(quote.price, 201.5);
        assert_eq!(quote.change_percent, 0.75);

        let empty: ProviderQuote = serde_json::from_str(r#"{"c":0,"d":null,"dp":null}"#).unwrap();
        assert!(!empty.is_valid());
    }
}
