//! Market refresh with a single-in-flight guard, and the periodic scheduler.

use allocator_config::MarketSettings;
use allocator_core::traits::{HistorySource, QuoteSource};
use allocator_data::{fetch_snapshot, MarketSnapshot, SymbolMap};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::session::{Decision, Session};

/// A completed fetch, stamped with the time it started.
#[derive(Debug, Clone)]
pub struct FetchedBatch {
    pub snapshot: MarketSnapshot,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New data installed and the decision recomputed
    Updated,
    /// Another refresh was already running
    Skipped,
    /// A newer batch was already cached
    Discarded,
    /// The cache was not stale
    Fresh,
}

/// Clears the in-flight flag when the fetch ends or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Fetches market batches, never more than one at a time.
pub struct MarketService {
    quotes: Arc<dyn QuoteSource>,
    history: Arc<dyn HistorySource>,
    symbols: SymbolMap,
    history_weeks: i64,
    request_delay: Duration,
    in_flight: AtomicBool,
}

impl MarketService {
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        history: Arc<dyn HistorySource>,
        market: &MarketSettings,
    ) -> Self {
        Self {
            quotes,
            history,
            symbols: market.symbols.clone(),
            history_weeks: i64::from(market.history_years) * 52,
            request_delay: Duration::from_millis(market.request_delay_ms),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch one batch. `None` when a fetch is already running; the
    /// trigger is dropped, not queued.
    pub async fn fetch(&self) -> Option<FetchedBatch> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("Refresh already in flight, skipping");
            return None;
        };

        let fetched_at = Utc::now();
        let from = fetched_at - chrono::Duration::weeks(self.history_weeks);
        info!(quotes = self.quotes.name(), "Refreshing market data");

        let snapshot = fetch_snapshot(
            self.quotes.as_ref(),
            self.history.as_ref(),
            &self.symbols,
            from,
            fetched_at,
            self.request_delay,
        )
        .await;

        debug!(
            quotes = snapshot.quotes.len(),
            history = snapshot.history.len(),
            benchmarks = snapshot.benchmarks.len(),
            "Market batch fetched"
        );
        Some(FetchedBatch {
            snapshot,
            fetched_at,
        })
    }
}

impl Session {
    /// Fetch, install and recompute.
    pub async fn refresh(&mut self, service: &MarketService) -> RefreshOutcome {
        let Some(batch) = service.fetch().await else {
            return RefreshOutcome::Skipped;
        };
        if !self.install(batch) {
            return RefreshOutcome::Discarded;
        }
        self.recompute(Utc::now());
        RefreshOutcome::Updated
    }

    /// Refresh only when the cache has timed out, as when the user comes
    /// back to the session.
    pub async fn refresh_if_stale(
        &mut self,
        service: &MarketService,
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        if !self.cache().is_stale(now) {
            return RefreshOutcome::Fresh;
        }
        self.refresh(service).await
    }
}

/// External refresh requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The user is back; refresh if stale
    Foreground,
    /// Refresh now
    Now,
}

/// Periodic refresh loop.
///
/// Fetches run on spawned tasks so the session stays responsive; results
/// come back over a channel and are installed in order of arrival.
pub struct Scheduler {
    service: Arc<MarketService>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(service: Arc<MarketService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Run until `shutdown` resolves. `on_decision` sees every recomputed
    /// decision.
    pub async fn run<S, F>(
        &self,
        session: &mut Session,
        mut triggers: mpsc::Receiver<Trigger>,
        shutdown: S,
        mut on_decision: F,
    ) where
        S: Future<Output = ()>,
        F: FnMut(&Decision),
    {
        let (batches_tx, mut batches_rx) = mpsc::channel::<FetchedBatch>(4);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);
        let mut triggers_open = true;

        info!(interval_secs = self.interval.as_secs(), "Scheduler started");
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Scheduler stopping");
                    break;
                }
                _ = ticker.tick() => self.spawn_fetch(&batches_tx),
                trigger = triggers.recv(), if triggers_open => match trigger {
                    Some(Trigger::Foreground) if !session.cache().is_stale(Utc::now()) => {
                        debug!("Cache fresh, foreground refresh skipped");
                    }
                    Some(_) => self.spawn_fetch(&batches_tx),
                    None => triggers_open = false,
                },
                Some(batch) = batches_rx.recv() => {
                    if session.install(batch) {
                        on_decision(session.recompute(Utc::now()));
                    }
                }
            }
        }
    }

    fn spawn_fetch(&self, batches: &mpsc::Sender<FetchedBatch>) {
        if self.service.is_refreshing() {
            debug!("Refresh already in flight, tick skipped");
            return;
        }
        let service = Arc::clone(&self.service);
        let batches = batches.clone();
        tokio::spawn(async move {
            if let Some(batch) = service.fetch().await {
                if batches.send(batch).await.is_err() {
                    debug!("Scheduler stopped, batch dropped");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocator_config::AppConfig;
    use allocator_core::error::DataError;
    use allocator_core::types::Quote;
    use allocator_data::StaticSource;
    use async_trait::async_trait;
    use tokio::sync::oneshot;

    /// Answers every request after a delay.
    struct SlowSource {
        delay: Duration,
    }

    #[async_trait]
    impl QuoteSource for SlowSource {
        async fn get_quote(&self, symbol: &str) -> Result<Quote, DataError> {
            tokio::time::sleep(self.delay).await;
            Err(DataError::SymbolNotFound(symbol.to_string()))
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[async_trait]
    impl HistorySource for SlowSource {
        async fn get_weekly_closes(
            &self,
            _symbol: &str,
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
        ) -> Result<Vec<f64>, DataError> {
            Err(DataError::NoDataAvailable)
        }
    }

    fn static_service(config: &AppConfig) -> MarketService {
        let symbols = &config.market.symbols;
        let source = Arc::new(
            StaticSource::new()
                .with_price(&symbols.gold, 245.0, 0.4)
                .with_price(&symbols.bonds, 100.0, -0.1)
                .with_price(&symbols.stocks, 85.75, 0.8)
                .with_price(&symbols.cash, 82.0, 0.0),
        );
        let mut market = config.market.clone();
        market.request_delay_ms = 0;
        MarketService::new(source.clone(), source, &market)
    }

    #[tokio::test]
    async fn test_concurrent_fetch_is_skipped() {
        let source = Arc::new(SlowSource {
            delay: Duration::from_millis(20),
        });
        let mut market = AppConfig::default().market;
        market.request_delay_ms = 0;
        let service = MarketService::new(source.clone(), source, &market);

        let (first, second) = tokio::join!(service.fetch(), service.fetch());
        assert_eq!(first.is_some() as u8 + second.is_some() as u8, 1);
        assert!(!service.is_refreshing());

        assert!(service.fetch().await.is_some());
    }

    #[tokio::test]
    async fn test_refresh_then_fresh() {
        let mut config = AppConfig::default();
        config.market.average_source = allocator_config::AverageSource::Reference;
        let service = static_service(&config);
        let mut session = Session::new(config);

        assert_eq!(session.refresh(&service).await, RefreshOutcome::Updated);
        let decision = session.decision().unwrap();
        assert!(!decision.defaulted);
        assert!(decision.signals.is_inflation());
        assert!(!decision.signals.is_exit());

        assert_eq!(
            session.refresh_if_stale(&service, Utc::now()).await,
            RefreshOutcome::Fresh
        );
        let later = Utc::now() + chrono::Duration::minutes(10);
        assert_eq!(
            session.refresh_if_stale(&service, later).await,
            RefreshOutcome::Updated
        );
    }

    #[tokio::test]
    async fn test_scheduler_delivers_decision() {
        let config = AppConfig::default();
        let service = Arc::new(static_service(&config));
        let mut session = Session::new(config);
        let scheduler = Scheduler::new(service, Duration::from_secs(3600));

        let (_trigger_tx, trigger_rx) = mpsc::channel(1);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut stop_tx = Some(stop_tx);
        let mut seen = 0;

        scheduler
            .run(
                &mut session,
                trigger_rx,
                async {
                    let _ = stop_rx.await;
                },
                |_| {
                    seen += 1;
                    if let Some(tx) = stop_tx.take() {
                        let _ = tx.send(());
                    }
                },
            )
            .await;

        assert_eq!(seen, 1);
        assert!(session.decision().is_some());
    }
}
