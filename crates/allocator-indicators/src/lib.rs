//! Moving averages and ratio series for regime detection.
//!
//! This crate provides:
//! - A sliding-window simple moving average
//! - Aligned ratio series built from two price series
//! - A synthetic monthly ratio history following the 7-year cycle calendar
//! - Moving-average providers (reference constants, historical, synthetic)

pub mod averages;
pub mod history;
pub mod moving_average;
pub mod ratio;

pub use averages::{HistoricalAverages, ReferenceAverages, SyntheticAverages};
pub use history::{CycleKind, RatioObservation, SyntheticRatioHistory, MA_WINDOW_MONTHS};
pub use moving_average::{trailing_mean, Sma};
pub use ratio::{mean_ratio, ratio_series};
