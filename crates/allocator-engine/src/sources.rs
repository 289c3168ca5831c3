//! Quote and history sources selected by configuration.

use allocator_config::AppConfig;
use allocator_core::error::AllocatorError;
use allocator_core::traits::{HistorySource, QuoteSource};
use allocator_data::{
    CsvHistorySource, FinnhubProvider, MarketDataProvider, ProviderChain, StaticSource,
    YahooProvider,
};
use std::sync::Arc;
use tracing::{info, warn};

type Sources = (Arc<dyn QuoteSource>, Arc<dyn HistorySource>);

/// Finnhub first, Yahoo second.
pub fn build_chain(config: &AppConfig) -> Result<ProviderChain, AllocatorError> {
    let market = &config.market;
    let api_key = std::env::var(&market.api_key_env).ok();
    if api_key.is_none() {
        warn!(var = %market.api_key_env, "No Finnhub API key, using the secondary provider only");
    }
    let providers: Vec<Box<dyn MarketDataProvider>> = vec![
        Box::new(FinnhubProvider::new(market.finnhub_base_url.clone(), api_key)?),
        Box::new(YahooProvider::new(market.yahoo_base_url.clone())?),
    ];
    let chain = ProviderChain::new(providers);
    info!(providers = ?chain.provider_names(), "Provider chain ready");
    Ok(chain)
}

/// Provider chain (Finnhub, then Yahoo) online; no quotes offline.
///
/// Weekly history comes from `market.history_dir` when configured, else
/// from the chain online and nowhere offline.
pub fn build_sources(config: &AppConfig, offline: bool) -> Result<Sources, AllocatorError> {
    let market = &config.market;
    let csv = market
        .history_dir
        .as_deref()
        .map(CsvHistorySource::new)
        .transpose()?
        .map(Arc::new);

    if offline {
        info!("Offline mode, live quotes disabled");
        let empty = Arc::new(StaticSource::new());
        let history: Arc<dyn HistorySource> = match csv {
            Some(csv) => csv,
            None => empty.clone(),
        };
        let quotes: Arc<dyn QuoteSource> = empty;
        return Ok((quotes, history));
    }

    let chain = Arc::new(build_chain(config)?);

    let history: Arc<dyn HistorySource> = match csv {
        Some(csv) => csv,
        None => chain.clone(),
    };
    let quotes: Arc<dyn QuoteSource> = chain;
    Ok((quotes, history))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_sources_have_no_quotes() {
        let (quotes, history) = build_sources(&AppConfig::default(), true).unwrap();
        assert!(quotes.get_quote("GLD").await.is_err());
        let now = chrono::Utc::now();
        assert!(history.get_weekly_closes("GLD", now, now).await.is_err());
    }

    #[test]
    fn test_chain_order() {
        let chain = build_chain(&AppConfig::default()).unwrap();
        assert_eq!(chain.provider_names(), vec!["finnhub", "yahoo"]);
    }

    #[test]
    fn test_missing_history_dir_is_rejected() {
        let mut config = AppConfig::default();
        config.market.history_dir = Some("does/not/exist".to_string());
        assert!(build_sources(&config, true).is_err());
    }
}
