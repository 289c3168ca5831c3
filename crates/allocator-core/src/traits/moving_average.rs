//! Moving-average provider trait.

use crate::types::MovingAverages;

/// Supplies the 7-year reference averages of both ratios.
///
/// Providers report `None` for a side they cannot compute; the signal
/// engine substitutes the reference constant in that case.
pub trait MovingAverageProvider: Send + Sync {
    /// Current averages.
    fn moving_averages(&self) -> MovingAverages;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
