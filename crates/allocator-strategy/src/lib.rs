//! Signal engine and allocation resolver.
//!
//! Turns the two regime ratios into a signal pair and maps the pair onto
//! one of the fixed quadrant allocations:
//! - Signal engine (ratio vs 7-year average)
//! - Economic-growth composite (weighted indicator votes)
//! - Allocation resolver (simple and extreme modes)

mod growth;
mod resolver;
mod signals;

pub use growth::{
    economic_cycle_favorable, estimate_diffusion_index, six_month_performance,
    yield_curve_normal, GrowthAssessment, GrowthIndicators, GrowthPolicy, GrowthVotes,
};
pub use resolver::{resolve_extreme, resolve_simple, AllocationResolver, Resolution};
pub use signals::compute_signals;
