//! Performance metrics of the reference portfolio.
//!
//! Simulates the equal-weight thirds portfolio (one third stocks, gold and
//! bonds each, held against one third cash at zero return) over weekly
//! closes and derives return, drawdown, volatility, Sharpe ratio and
//! doubling time.

mod performance;

pub use performance::{PerformanceMetrics, PerformanceTargets, WEEKS_PER_YEAR};
