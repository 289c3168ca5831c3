//! Core types and traits for the allocation calculator.
//!
//! This crate provides the foundational building blocks including:
//! - Asset classes and the four-way allocation vector
//! - Price ratios, moving averages and the signal pair derived from them
//! - Quadrants, user portfolios and rebalancing recommendations
//! - Traits for quote, history and moving-average sources

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AllocatorError, AllocatorResult};
pub use traits::*;
pub use types::*;
