//! JSON snapshot of a session.

use allocator_core::error::AllocatorError;
use allocator_core::types::{
    Allocation, AllocationMode, MovingAverages, Quadrant, Quote, Recommendation, SignalPair,
    UserPortfolio,
};
use allocator_data::RatioEstimate;
use allocator_risk::ThreatLevel;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub app_name: String,
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub snapshot_id: Uuid,
    pub mode: AllocationMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub estimate: RatioEstimate,
    pub averages: MovingAverages,
    /// Asset and benchmark quotes by symbol
    pub quotes: BTreeMap<String, Quote>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Point-in-time export of the portfolio and the decision behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub metadata: ExportMetadata,
    pub portfolio: UserPortfolio,
    pub signals: SignalPair,
    pub quadrant: Quadrant,
    pub target_allocation: Allocation,
    pub market_data: MarketData,
    pub recommendations: Vec<Recommendation>,
    pub threat_level: ThreatLevel,
    pub next_rebalance_date: Option<NaiveDate>,
}

impl ExportSnapshot {
    /// Snapshot the session's last decision.
    pub fn from_session(session: &Session, now: DateTime<Utc>) -> Result<Self, AllocatorError> {
        let decision = session.decision().ok_or_else(|| {
            AllocatorError::Internal("no allocation has been computed yet".to_string())
        })?;
        let snapshot = session.cache().snapshot();
        let quotes = snapshot
            .quotes
            .iter()
            .chain(snapshot.benchmarks.iter())
            .map(|(symbol, quote)| (symbol.clone(), quote.clone()))
            .collect();

        Ok(Self {
            metadata: ExportMetadata {
                app_name: session.config().app.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                export_date: now,
                snapshot_id: Uuid::new_v4(),
                mode: decision.resolution.mode,
            },
            portfolio: *session.portfolio(),
            signals: decision.signals,
            quadrant: decision.resolution.quadrant,
            target_allocation: decision.target,
            market_data: MarketData {
                estimate: decision.estimate.clone(),
                averages: decision.averages,
                quotes,
                last_update: session.cache().last_update(),
            },
            recommendations: decision.recommendations.clone(),
            threat_level: decision.threat,
            next_rebalance_date: decision.next_rebalance,
        })
    }

    pub fn to_json(&self) -> Result<String, AllocatorError> {
        serde_json::to_string_pretty(self).map_err(|e| AllocatorError::Serialization(e.to_string()))
    }

    pub fn write_to(&self, path: &Path) -> Result<(), AllocatorError> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), id = %self.metadata.snapshot_id, "Snapshot exported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocator_config::AppConfig;
    use rust_decimal_macros::dec;

    #[test]
    fn test_export_requires_a_decision() {
        let session = Session::new(AppConfig::default());
        assert!(ExportSnapshot::from_session(&session, Utc::now()).is_err());
    }

    #[test]
    fn test_export_contents() {
        let mut session = Session::new(AppConfig::default());
        session.set_portfolio(UserPortfolio::new(
            dec!(10000),
            dec!(0),
            dec!(10000),
            dec!(10000),
        ));
        session.recompute(Utc::now());

        let export = ExportSnapshot::from_session(&session, Utc::now()).unwrap();
        assert_eq!(export.metadata.app_name, "ratio-allocator");
        assert_eq!(export.target_allocation, Allocation::new(33.33, 0.0, 33.33, 33.33));
        assert_eq!(export.recommendations.len(), 4);

        let value: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        for key in [
            "metadata",
            "portfolio",
            "signals",
            "target_allocation",
            "market_data",
            "recommendations",
            "next_rebalance_date",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["quadrant"], "simple-deflation");

        let parsed: ExportSnapshot = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(parsed.metadata.snapshot_id, export.metadata.snapshot_id);
    }

    #[test]
    fn test_write_to_missing_directory_is_io_error() {
        let mut session = Session::new(AppConfig::default());
        session.recompute(Utc::now());
        let export = ExportSnapshot::from_session(&session, Utc::now()).unwrap();

        let path = std::env::temp_dir()
            .join(format!("allocator-missing-{}", std::process::id()))
            .join("snapshot.json");
        assert!(matches!(export.write_to(&path), Err(AllocatorError::Io(_))));
    }
}
