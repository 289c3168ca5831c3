//! Gradual transitions between quadrant allocations.
//!
//! When the resolved quadrant changes, the emitted allocation moves from the
//! previous quadrant's allocation towards the new one over several
//! rebalancing cycles. Emergency quadrants move faster. Independently, the
//! per-asset distance to the user's actual holdings is capped each cycle.

use allocator_core::types::{Allocation, AssetClass, Quadrant};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Transition smoothing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Whether smoothing is applied at all
    pub enabled: bool,
    /// Maximum per-asset change against the current holdings, in points
    pub max_change_per_cycle: f64,
    /// Progress per cycle into an exit quadrant
    pub exit_speed: f64,
    /// Progress per cycle into the stagflation quadrant
    pub stagflation_speed: f64,
    /// Progress per cycle for every other transition
    pub default_speed: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_change_per_cycle: 15.0,
            exit_speed: 0.50,
            stagflation_speed: 0.40,
            default_speed: 0.25,
        }
    }
}

impl TransitionConfig {
    /// Progress increment for a transition into `to`.
    pub fn speed(&self, to: Quadrant) -> f64 {
        if to.is_exit() {
            self.exit_speed
        } else if to.is_stagflation() {
            self.stagflation_speed
        } else {
            self.default_speed
        }
    }
}

/// Progress of the current transition, carried between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionState {
    /// Last fully reached quadrant, `None` before the first cycle
    pub previous_quadrant: Option<Quadrant>,
    /// Allocation of the last fully reached quadrant
    pub previous_allocation: Allocation,
    /// Quadrant being moved towards
    pub target_quadrant: Option<Quadrant>,
    /// Blend progress in [0, 1]; 1 means complete
    pub progress: f64,
}

impl Default for TransitionState {
    fn default() -> Self {
        Self {
            previous_quadrant: None,
            previous_allocation: Allocation::default(),
            target_quadrant: None,
            progress: 1.0,
        }
    }
}

impl TransitionState {
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    fn settled(quadrant: Quadrant, allocation: Allocation) -> Self {
        Self {
            previous_quadrant: Some(quadrant),
            previous_allocation: allocation,
            target_quadrant: Some(quadrant),
            progress: 1.0,
        }
    }
}

/// Result of one smoothing step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub allocation: Allocation,
    pub state: TransitionState,
}

/// Blends resolved targets across quadrant changes.
#[derive(Debug, Clone, Default)]
pub struct TransitionSmoother {
    config: TransitionConfig,
}

impl TransitionSmoother {
    pub fn new(config: TransitionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Advance the transition by one cycle.
    ///
    /// `current` is the user's actual allocation, `None` when the user holds
    /// nothing, in which case the per-cycle cap is skipped.
    pub fn smooth(
        &self,
        state: &TransitionState,
        target: Allocation,
        quadrant: Quadrant,
        current: Option<&Allocation>,
    ) -> TransitionOutcome {
        let previous = match state.previous_quadrant {
            Some(previous) if previous != quadrant => previous,
            _ => {
                return TransitionOutcome {
                    allocation: target,
                    state: TransitionState::settled(quadrant, target),
                };
            }
        };

        // Progress only restarts when the destination itself changes.
        let start = if state.target_quadrant == Some(quadrant) {
            state.progress.clamp(0.0, 1.0)
        } else {
            info!(from = %previous, to = %quadrant, "Quadrant transition started");
            0.0
        };
        let progress = (start + self.config.speed(quadrant)).min(1.0);

        let blended = state.previous_allocation.blend(&target, progress);
        let allocation = match current {
            Some(current) => self.cap_change(&blended, current),
            None => blended,
        };

        debug!(
            to = %quadrant,
            progress = format!("{:.1}%", progress * 100.0),
            %allocation,
            "Transition step"
        );

        let state = if progress >= 1.0 {
            info!(quadrant = %quadrant, "Quadrant transition complete");
            TransitionState::settled(quadrant, target)
        } else {
            TransitionState {
                previous_quadrant: Some(previous),
                previous_allocation: state.previous_allocation,
                target_quadrant: Some(quadrant),
                progress,
            }
        };

        TransitionOutcome { allocation, state }
    }

    /// Clip each asset to within the per-cycle cap of the current holdings,
    /// clamp to [0, 100] and renormalize.
    pub fn cap_change(&self, target: &Allocation, current: &Allocation) -> Allocation {
        let max_change = self.config.max_change_per_cycle;
        Allocation::from_fn(|asset: AssetClass| {
            let from = current.get(asset);
            let to = target.get(asset);
            let capped = if (to - from).abs() <= max_change {
                to
            } else if to > from {
                from + max_change
            } else {
                from - max_change
            };
            capped.clamp(0.0, 100.0)
        })
        .normalized()
    }
}
