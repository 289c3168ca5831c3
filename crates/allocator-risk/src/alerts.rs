//! Critical market situations and alert throttling.

use allocator_core::types::{MovingAverages, RatioPair, SignalPair};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Gold/bonds excess over its average, in percent, that counts as accelerating.
const ACCELERATING_INFLATION_PCT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Error,
}

/// A market regime worth interrupting the user for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriticalSituation {
    /// No growth with inflation
    Stagflation,
    /// Exit signal active
    GrizzlyBear,
    /// No growth, no exit signal
    ProbableRecession,
    /// Gold/bonds far above its average
    AcceleratingInflation { intensity: f64 },
}

impl CriticalSituation {
    pub fn severity(&self) -> AlertSeverity {
        match self {
            CriticalSituation::Stagflation | CriticalSituation::GrizzlyBear => AlertSeverity::Error,
            _ => AlertSeverity::Warning,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CriticalSituation::Stagflation => "Stagflation detected",
            CriticalSituation::GrizzlyBear => "Grizzly bear market detected",
            CriticalSituation::ProbableRecession => "Recession probable",
            CriticalSituation::AcceleratingInflation { .. } => "Accelerating inflation",
        }
    }

    pub fn message(&self) -> String {
        match self {
            CriticalSituation::Stagflation => {
                "Recession with inflation: leave stocks and bonds, hold only gold and cash".to_string()
            }
            CriticalSituation::GrizzlyBear => {
                "Major bear market under way: 0% stocks until the signals turn".to_string()
            }
            CriticalSituation::ProbableRecession => {
                "Recession signals detected: reduce stock exposure".to_string()
            }
            CriticalSituation::AcceleratingInflation { intensity } => format!(
                "Inflation signal {intensity:+.1}% above its 7-year average: avoid bonds"
            ),
        }
    }
}

/// Every critical situation present, most severe first.
pub fn detect_critical_situations(
    signals: &SignalPair,
    is_growth: bool,
    ratios: &RatioPair,
    averages: &MovingAverages,
) -> Vec<CriticalSituation> {
    let mut situations = Vec::new();

    if !is_growth && signals.is_inflation() {
        situations.push(CriticalSituation::Stagflation);
    }
    if signals.is_exit() {
        situations.push(CriticalSituation::GrizzlyBear);
    }
    if !is_growth && !signals.is_exit() {
        situations.push(CriticalSituation::ProbableRecession);
    }
    if signals.is_inflation() {
        if let Some(gold_bonds) = ratios.usable_gold_bonds() {
            let intensity = (gold_bonds / averages.gold_bonds_or_reference() - 1.0) * 100.0;
            if intensity > ACCELERATING_INFLATION_PCT {
                situations.push(CriticalSituation::AcceleratingInflation { intensity });
            }
        }
    }

    situations
}

/// Lets at most one alert through per window.
#[derive(Debug, Clone)]
pub struct AlertThrottle {
    window: Duration,
    last_alert: Option<DateTime<Utc>>,
}

impl Default for AlertThrottle {
    fn default() -> Self {
        Self::new(Duration::seconds(30))
    }
}

impl AlertThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_alert: None,
        }
    }

    /// Whether an alert may be raised at `now`; records it if so.
    pub fn admit(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(last) = self.last_alert {
            if now - last < self.window {
                return false;
            }
        }
        self.last_alert = Some(now);
        true
    }

    pub fn last_alert(&self) -> Option<DateTime<Utc>> {
        self.last_alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocator_core::types::{ExitSignal, InflationSignal};

    fn averages() -> MovingAverages {
        MovingAverages::new(2.0, 30.0)
    }

    #[test]
    fn test_stagflation_and_acceleration() {
        let signals = SignalPair::new(InflationSignal::Gold, ExitSignal::KeepStocks);
        let found =
            detect_critical_situations(&signals, false, &RatioPair::new(2.5, 35.0), &averages());
        assert_eq!(found.len(), 3);
        assert_eq!(found[0], CriticalSituation::Stagflation);
        assert_eq!(found[1], CriticalSituation::ProbableRecession);
        match found[2] {
            CriticalSituation::AcceleratingInflation { intensity } => {
                assert!((intensity - 25.0).abs() < 1e-9)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(found[0].severity(), AlertSeverity::Error);
    }

    #[test]
    fn test_grizzly_suppresses_recession() {
        let signals = SignalPair::new(InflationSignal::Bonds, ExitSignal::ExitStocks);
        let found =
            detect_critical_situations(&signals, false, &RatioPair::new(1.8, 25.0), &averages());
        assert_eq!(found, vec![CriticalSituation::GrizzlyBear]);
    }

    #[test]
    fn test_calm_growth_has_no_alerts() {
        let found = detect_critical_situations(
            &SignalPair::default(),
            true,
            &RatioPair::new(1.9, 35.0),
            &averages(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_throttle_window() {
        let mut throttle = AlertThrottle::default();
        let t0 = Utc::now();
        assert!(throttle.admit(t0));
        assert!(!throttle.admit(t0 + Duration::seconds(10)));
        assert!(throttle.admit(t0 + Duration::seconds(30)));
        assert_eq!(throttle.last_alert(), Some(t0 + Duration::seconds(30)));
    }
}
