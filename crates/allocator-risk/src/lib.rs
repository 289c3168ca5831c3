//! Transition smoothing, rebalancing recommendations and alerts.
//!
//! Everything downstream of the resolved target allocation.

mod alerts;
mod rebalance;
mod recommendation;
mod threat;
mod transition;

pub use alerts::{detect_critical_situations, AlertSeverity, AlertThrottle, CriticalSituation};
pub use rebalance::{RebalanceCalendar, RebalanceReminder};
pub use recommendation::{RecommendationEngine, DEFAULT_TOLERANCE};
pub use threat::{ThreatBand, ThreatInputs, ThreatLevel};
pub use transition::{TransitionConfig, TransitionOutcome, TransitionSmoother, TransitionState};
