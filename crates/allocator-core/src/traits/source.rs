//! Market data source trait definitions.

use crate::error::DataError;
use crate::types::Quote;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for last-price quote sources.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Get the latest quote for a symbol.
    ///
    /// An unavailable symbol is an error; callers substitute a fallback
    /// price rather than failing the whole computation.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

/// Trait for historical weekly closes.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch weekly closing prices ordered from oldest to newest.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `from` - Start of the range
    /// * `to` - End of the range
    async fn get_weekly_closes(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<f64>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedSource {
        prices: HashMap<String, f64>,
    }

    #[async_trait]
    impl QuoteSource for FixedSource {
        async fn get_quote(&self, symbol: &str) -> Result<Quote, DataError> {
            let price = self
                .prices
                .get(symbol)
                .copied()
                .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;
            Ok(Quote {
                symbol: symbol.to_string(),
                price,
                change: 0.0,
                change_percent: 0.0,
                timestamp: 0,
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_quote_source_object() {
        let source: Box<dyn QuoteSource> = Box::new(FixedSource {
            prices: [("GLD".to_string(), 200.0)].into_iter().collect(),
        });

        let quote = source.get_quote("GLD").await.unwrap();
        assert_eq!(quote.price, 200.0);
        assert!(matches!(
            source.get_quote("TLT").await,
            Err(DataError::SymbolNotFound(_))
        ));
    }
}
