//! Explicit session state and the decision pipeline.

use allocator_analytics::PerformanceMetrics;
use allocator_config::{AppConfig, AverageSource};
use allocator_core::error::DataError;
use allocator_core::traits::MovingAverageProvider;
use allocator_core::types::{
    Allocation, AllocationMode, AssetClass, MovingAverages, Recommendation, SignalPair,
    UserPortfolio,
};
use allocator_data::{
    estimate_ratios, require_quotes, validate_market_data, MarketCache, PriceOrigin,
    RatioEstimate,
};
use allocator_indicators::{HistoricalAverages, SyntheticAverages};
use allocator_risk::{
    detect_critical_situations, AlertSeverity, AlertThrottle, CriticalSituation,
    RebalanceReminder, RecommendationEngine, ThreatInputs, ThreatLevel, TransitionSmoother,
    TransitionState,
};
use allocator_strategy::{
    compute_signals, economic_cycle_favorable, estimate_diffusion_index, six_month_performance,
    yield_curve_normal, AllocationResolver, GrowthIndicators, Resolution,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::refresh::FetchedBatch;

/// Output of one pass through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub computed_at: DateTime<Utc>,
    pub estimate: RatioEstimate,
    pub averages: MovingAverages,
    pub signals: SignalPair,
    /// No market data at all; signals are the calm defaults
    pub defaulted: bool,
    pub indicators: GrowthIndicators,
    pub resolution: Resolution,
    /// Allocation to hold, after transition smoothing
    pub target: Allocation,
    pub recommendations: Vec<Recommendation>,
    pub performance: PerformanceMetrics,
    pub threat: ThreatLevel,
    pub alerts: Vec<CriticalSituation>,
    /// Recoverable data problems met on the way
    pub warnings: Vec<DataError>,
    pub next_rebalance: Option<NaiveDate>,
    pub reminder: Option<RebalanceReminder>,
}

/// Everything one user works with.
///
/// The decision functions are pure; the session only carries their inputs
/// and the state that must survive between cycles.
#[derive(Debug)]
pub struct Session {
    config: AppConfig,
    resolver: AllocationResolver,
    smoother: TransitionSmoother,
    recommender: RecommendationEngine,
    mode: AllocationMode,
    portfolio: UserPortfolio,
    cache: MarketCache,
    transition: TransitionState,
    throttle: AlertThrottle,
    decision: Option<Decision>,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            resolver: AllocationResolver::new(config.growth.clone()),
            smoother: TransitionSmoother::new(config.transition.clone()),
            recommender: RecommendationEngine::new(config.allocation.tolerance),
            mode: config.allocation.mode,
            portfolio: UserPortfolio::default(),
            cache: MarketCache::new(Duration::seconds(config.market.cache_timeout_secs)),
            transition: TransitionState::default(),
            throttle: AlertThrottle::default(),
            decision: None,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn mode(&self) -> AllocationMode {
        self.mode
    }

    /// Takes effect on the next recompute.
    pub fn set_mode(&mut self, mode: AllocationMode) {
        self.mode = mode;
    }

    pub fn portfolio(&self) -> &UserPortfolio {
        &self.portfolio
    }

    /// Replace the holdings and refresh the recommendations against the
    /// current target.
    pub fn set_portfolio(&mut self, portfolio: UserPortfolio) {
        self.portfolio = portfolio;
        if let Some(decision) = self.decision.as_mut() {
            decision.recommendations =
                self.recommender.recommend(&self.portfolio, &decision.target);
        }
    }

    pub fn cache(&self) -> &MarketCache {
        &self.cache
    }

    pub fn transition_state(&self) -> &TransitionState {
        &self.transition
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    /// Install a fetched batch unless a newer one is already cached.
    pub fn install(&mut self, batch: FetchedBatch) -> bool {
        if let Some(last) = self.cache.last_update() {
            if batch.fetched_at < last {
                debug!(fetched_at = %batch.fetched_at, %last, "Discarding superseded batch");
                return false;
            }
        }
        self.cache.replace(batch.snapshot, batch.fetched_at);
        true
    }

    /// Run the full pipeline over the cached market data.
    pub fn recompute(&mut self, now: DateTime<Utc>) -> &Decision {
        let market = &self.config.market;
        let estimate = estimate_ratios(&self.cache, &market.symbols, &market.fallback_prices);

        let mut warnings = Vec::new();
        if let Err(e) = require_quotes(self.cache.snapshot(), &market.symbols) {
            warnings.push(e);
        }
        warnings.extend(estimate.missing_inputs(&market.symbols));
        warnings.extend(validate_market_data(
            &estimate,
            &self.config.validation,
            market.symbols.gold_is_etf(),
        ));

        let averages = self.moving_averages(now);
        let defaulted = estimate.is_fully_substituted();
        let signals = if defaulted {
            warn!("No market data available, using default signals");
            SignalPair::default()
        } else {
            compute_signals(&estimate.ratios, &averages)
        };

        let performance = self.performance();
        let indicators = self.growth_indicators(&estimate, &performance, now);
        let resolution = self.resolver.resolve(&signals, self.mode, &indicators);

        let target = if self.smoother.config().enabled {
            let current = self.portfolio.current_allocation();
            let outcome = self.smoother.smooth(
                &self.transition,
                resolution.allocation,
                resolution.quadrant,
                current.as_ref(),
            );
            self.transition = outcome.state;
            outcome.allocation
        } else {
            resolution.allocation
        };

        let recommendations = self.recommender.recommend(&self.portfolio, &target);

        let alerts = detect_critical_situations(
            &signals,
            resolution.growth.is_growth,
            &estimate.ratios,
            &averages,
        );
        if !alerts.is_empty() && self.throttle.admit(now) {
            for alert in &alerts {
                match alert.severity() {
                    AlertSeverity::Error => error!(title = alert.title(), "{}", alert.message()),
                    AlertSeverity::Warning => warn!(title = alert.title(), "{}", alert.message()),
                }
            }
        }

        let has_history = performance.weeks > 0;
        let threat = ThreatLevel::assess(&ThreatInputs {
            signals,
            ratios: estimate.ratios,
            averages,
            volatility: has_history.then_some(performance.volatility_pct),
            max_drawdown: has_history.then_some(performance.max_drawdown_pct),
            live_stocks_gold: estimate.live_stocks_gold(),
        });

        let today = now.date_naive();
        let next_rebalance = self.config.rebalance.next_date(today);
        let reminder = self.config.rebalance.reminder(today);
        if let Some(reminder) = reminder {
            info!(
                date = %reminder.date,
                days = reminder.days_remaining,
                "Rebalancing date approaching"
            );
        }

        info!(
            inflation = %signals.inflation,
            exit = %signals.exit,
            quadrant = %resolution.quadrant,
            %target,
            threat = threat.value(),
            "Allocation computed"
        );

        self.decision.insert(Decision {
            computed_at: now,
            estimate,
            averages,
            signals,
            defaulted,
            indicators,
            resolution,
            target,
            recommendations,
            performance,
            threat,
            alerts,
            warnings,
            next_rebalance,
            reminder,
        })
    }

    fn history(&self, symbol: &str) -> &[f64] {
        self.cache.history(symbol).unwrap_or(&[])
    }

    fn moving_averages(&self, now: DateTime<Utc>) -> MovingAverages {
        let market = &self.config.market;
        let reference = market.reference_averages();
        let provider: Box<dyn MovingAverageProvider> = match market.average_source {
            AverageSource::Reference => return reference,
            AverageSource::Historical => Box::new(HistoricalAverages::new(
                self.history(&market.symbols.gold).to_vec(),
                self.history(&market.symbols.bonds).to_vec(),
                self.history(&market.symbols.stocks).to_vec(),
            )),
            AverageSource::Synthetic => Box::new(SyntheticAverages::new(now.year())),
        };

        let averages = provider.moving_averages();
        if averages.gold_bonds.is_none() || averages.stocks_gold.is_none() {
            debug!(provider = provider.name(), "Incomplete averages, filling from reference");
        }
        averages.or(reference)
    }

    fn performance(&self) -> PerformanceMetrics {
        let symbols = &self.config.market.symbols;
        PerformanceMetrics::from_weekly_closes(
            self.history(&symbols.gold),
            self.history(&symbols.bonds),
            self.history(&symbols.stocks),
        )
    }

    fn growth_indicators(
        &self,
        estimate: &RatioEstimate,
        performance: &PerformanceMetrics,
        now: DateTime<Utc>,
    ) -> GrowthIndicators {
        let symbols = &self.config.market.symbols;
        let known_price = |asset: AssetClass| {
            (estimate.origin(asset) != PriceOrigin::Fallback).then(|| estimate.price(asset))
        };
        let change = |symbol: &str| self.cache.quote(symbol).map(|q| q.change_percent);

        GrowthIndicators {
            stocks_performance_6m: six_month_performance(
                known_price(AssetClass::Stocks),
                self.history(&symbols.stocks),
            ),
            bonds_performance_6m: six_month_performance(
                known_price(AssetClass::Bonds),
                self.history(&symbols.bonds),
            ),
            stocks_bonds_ratio: estimate.stocks_bonds_ratio(),
            volatility: performance.volatility_pct,
            yield_curve_normal: yield_curve_normal(change(&symbols.bonds), change(&symbols.cash)),
            diffusion_index: estimate_diffusion_index(
                self.cache
                    .benchmark(&symbols.cyclical_benchmark)
                    .map(|q| q.change_percent),
                change(&symbols.gold),
            ),
            cycle_favorable: economic_cycle_favorable(now.year()),
        }
    }
}
