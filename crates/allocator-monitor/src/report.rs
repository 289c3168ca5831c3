//! Plain-text decision report.

use allocator_core::error::DataError;
use allocator_core::types::{
    Action, Allocation, AssetClass, MovingAverages, Recommendation, SignalPair,
};
use allocator_data::{PriceOrigin, RatioEstimate};
use allocator_risk::{CriticalSituation, RebalanceReminder, ThreatBand, ThreatLevel};
use allocator_strategy::Resolution;
use chrono::{DateTime, NaiveDate, Utc};

const RULE: &str = "═══════════════════════════════════════════════════════════\n";
const SECTION: &str = "───────────────────────────────────────────────────────────\n";

/// Everything one report shows, borrowed from the computed decision.
#[derive(Debug, Clone, Copy)]
pub struct ReportView<'a> {
    pub computed_at: DateTime<Utc>,
    pub estimate: &'a RatioEstimate,
    pub averages: &'a MovingAverages,
    pub signals: &'a SignalPair,
    pub resolution: &'a Resolution,
    /// Allocation after transition smoothing
    pub target: &'a Allocation,
    pub recommendations: &'a [Recommendation],
    pub threat: ThreatLevel,
    pub alerts: &'a [CriticalSituation],
    pub warnings: &'a [DataError],
    pub next_rebalance: Option<NaiveDate>,
    pub reminder: Option<RebalanceReminder>,
}

impl ReportView<'_> {
    pub fn render(&self) -> String {
        let mut s = String::new();

        s.push_str(RULE);
        s.push_str("                    ALLOCATION REPORT                      \n");
        s.push_str(RULE);
        s.push_str(&format!(
            "  Computed:            {}\n\n",
            self.computed_at.format("%Y-%m-%d %H:%M UTC")
        ));

        s.push_str("MARKET\n");
        s.push_str(SECTION);
        for asset in AssetClass::ALL {
            let origin = match self.estimate.origin(asset) {
                PriceOrigin::Quote => "live",
                PriceOrigin::History => "last close",
                PriceOrigin::Fallback => "reference",
            };
            s.push_str(&format!(
                "  {:<8}             {:>10.2}  ({})\n",
                asset.name(),
                self.estimate.price(asset),
                origin
            ));
        }
        s.push_str(&format!(
            "  Gold/Bonds:          {:>10.3}  (MA {:.3})\n",
            self.estimate.ratios.gold_bonds,
            self.averages.gold_bonds_or_reference()
        ));
        s.push_str(&format!(
            "  Stocks/Gold:         {:>10.2}  (MA {:.2})\n\n",
            self.estimate.ratios.stocks_gold,
            self.averages.stocks_gold_or_reference()
        ));

        s.push_str("SIGNALS\n");
        s.push_str(SECTION);
        s.push_str(&format!("  Inflation:           {}\n", self.signals.inflation));
        s.push_str(&format!("  Exit:                {}\n", self.signals.exit));
        let growth = &self.resolution.growth;
        s.push_str(&format!(
            "  Growth:              {} ({:.0}%, {} of 7 votes)\n\n",
            if growth.is_growth { "yes" } else { "no" },
            growth.probability * 100.0,
            growth.votes.count()
        ));

        s.push_str("TARGET ALLOCATION\n");
        s.push_str(SECTION);
        s.push_str(&format!("  Mode:                {}\n", self.resolution.mode));
        s.push_str(&format!("  Quadrant:            {}\n", self.resolution.quadrant));
        for (asset, pct) in self.target.iter() {
            s.push_str(&format!("  {:<8}             {:>6.2}%\n", asset.name(), pct));
        }
        if self.target != &self.resolution.allocation {
            s.push_str(&format!("  (transitioning towards {})\n", self.resolution.allocation));
        }
        s.push('\n');

        if !self.recommendations.is_empty() {
            s.push_str("RECOMMENDATIONS\n");
            s.push_str(SECTION);
            for rec in self.recommendations {
                let amount = match rec.action {
                    Action::Hold => String::new(),
                    _ => format!("{:.2}", rec.amount_delta),
                };
                s.push_str(&format!(
                    "  {:<8} {:>6.2}% -> {:>6.2}%   {:<4} {:>12}\n",
                    rec.asset.name(),
                    rec.current_percent,
                    rec.target_percent,
                    rec.action,
                    amount
                ));
            }
            s.push('\n');
        }

        s.push_str("RISK\n");
        s.push_str(SECTION);
        let band = match self.threat.band() {
            ThreatBand::Low => "low",
            ThreatBand::Elevated => "elevated",
            ThreatBand::High => "high",
        };
        s.push_str(&format!("  Grizzly threat:      {}/100 ({})\n", self.threat.value(), band));
        match self.next_rebalance {
            Some(date) => s.push_str(&format!("  Next rebalance:      {date}\n")),
            None => s.push_str("  Next rebalance:      not scheduled\n"),
        }
        if let Some(reminder) = self.reminder {
            s.push_str(&format!(
                "  Rebalance due in {} day(s)\n",
                reminder.days_remaining
            ));
        }
        for alert in self.alerts {
            s.push_str(&format!("  ! {}: {}\n", alert.title(), alert.message()));
        }

        if !self.warnings.is_empty() {
            s.push('\n');
            s.push_str("DATA WARNINGS\n");
            s.push_str(SECTION);
            for warning in self.warnings {
                s.push_str(&format!("  {warning}\n"));
            }
        }

        s.push_str(RULE);
        s
    }

    /// One-line form for the watch loop.
    pub fn headline(&self) -> String {
        format!(
            "[{}] {} / {} -> {} | {}",
            self.resolution.mode,
            self.signals.inflation,
            self.signals.exit,
            self.resolution.quadrant,
            self.target
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocator_core::types::{AllocationMode, ExitSignal, InflationSignal, Quadrant, RatioPair};
    use allocator_strategy::{GrowthAssessment, GrowthVotes};
    use rust_decimal_macros::dec;

    fn estimate() -> RatioEstimate {
        RatioEstimate {
            prices: Allocation::new(57.0, 200.0, 81.6, 100.0),
            origins: [
                (AssetClass::Stocks, PriceOrigin::Quote),
                (AssetClass::Gold, PriceOrigin::Quote),
                (AssetClass::Bonds, PriceOrigin::History),
                (AssetClass::Cash, PriceOrigin::Fallback),
            ],
            ratios: RatioPair::new(2.45, 28.5),
        }
    }

    fn resolution() -> Resolution {
        Resolution {
            allocation: Quadrant::GrizzlyInflation.allocation(),
            quadrant: Quadrant::GrizzlyInflation,
            mode: AllocationMode::Simple,
            growth: GrowthAssessment {
                votes: GrowthVotes::default(),
                score: 0.0,
                max_score: 9.3,
                probability: 0.0,
                is_growth: false,
            },
        }
    }

    #[test]
    fn test_render_sections() {
        let estimate = estimate();
        let averages = MovingAverages::reference();
        let signals = SignalPair::new(InflationSignal::Gold, ExitSignal::ExitStocks);
        let resolution = resolution();
        let recommendations = vec![Recommendation {
            asset: AssetClass::Bonds,
            current_percent: 33.0,
            target_percent: 0.0,
            action: Action::Sell,
            amount_delta: dec!(16500),
        }];
        let alerts = vec![CriticalSituation::GrizzlyBear];
        let warnings = vec![DataError::MissingInput {
            symbol: "SHY".to_string(),
        }];

        let view = ReportView {
            computed_at: Utc::now(),
            estimate: &estimate,
            averages: &averages,
            signals: &signals,
            resolution: &resolution,
            target: &resolution.allocation,
            recommendations: &recommendations,
            threat: ThreatLevel(59),
            alerts: &alerts,
            warnings: &warnings,
            next_rebalance: NaiveDate::from_ymd_opt(2026, 12, 15),
            reminder: None,
        };
        let text = view.render();

        assert!(text.contains("EXIT_STOCKS"));
        assert!(text.contains("grizzly-inflation"));
        assert!(text.contains("SELL"));
        assert!(text.contains("16500.00"));
        assert!(text.contains("59/100 (elevated)"));
        assert!(text.contains("2026-12-15"));
        assert!(text.contains("No price data for SHY"));
        assert!(!text.contains("transitioning"));

        assert!(view.headline().starts_with("[simple] GOLD / EXIT_STOCKS"));
    }
}
