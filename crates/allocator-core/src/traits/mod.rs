//! Core traits for the allocation calculator.

mod indicator;
mod moving_average;
mod source;

pub use indicator::Indicator;
pub use moving_average::MovingAverageProvider;
pub use source::{HistorySource, QuoteSource};
