//! Core data types for the allocation calculator.

mod allocation;
mod market;
mod portfolio;
mod quadrant;
mod signal;

pub use allocation::{Allocation, AssetClass, SUM_TOLERANCE};
pub use market::{
    MovingAverages, Quote, RatioPair, REFERENCE_GOLD_BONDS_MA, REFERENCE_STOCKS_GOLD_MA,
    STOCKS_GOLD_SCALE,
};
pub use portfolio::{Action, Recommendation, UserPortfolio};
pub use quadrant::{AllocationMode, Quadrant};
pub use signal::{ExitSignal, InflationSignal, SignalPair};
