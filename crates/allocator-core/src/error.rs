//! Error types for the allocation calculator.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum AllocatorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Market data errors.
///
/// The first four variants form the recovery taxonomy used by the decision
/// pipeline. None of them is fatal there: missing symbols are replaced by
/// fallback prices, out-of-bounds values only raise warnings, and a fully
/// unavailable upstream yields the default signal pair.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("No price data for {symbol}")]
    MissingInput { symbol: String },

    #[error("{field} = {value:.3} outside plausible range [{low}, {high}]")]
    OutOfBounds {
        field: String,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("All quote sources failed for {symbol}")]
    UpstreamUnavailable { symbol: String },

    #[error("Partial data: no quote for {}", missing.join(", "))]
    PartialData { missing: Vec<String> },

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Endpoint not allowed: {0}")]
    EndpointNotAllowed(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

impl DataError {
    /// Whether the pipeline can keep going with best-available values.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DataError::MissingInput { .. }
                | DataError::OutOfBounds { .. }
                | DataError::UpstreamUnavailable { .. }
                | DataError::PartialData { .. }
        )
    }
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },
}

/// Result type alias.
pub type AllocatorResult<T> = Result<T, AllocatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_taxonomy() {
        assert!(DataError::MissingInput {
            symbol: "GLD".into()
        }
        .is_recoverable());
        assert!(DataError::PartialData {
            missing: vec!["TLT".into()]
        }
        .is_recoverable());
        assert!(DataError::UpstreamUnavailable {
            symbol: "GLD".into()
        }
        .is_recoverable());
        assert!(!DataError::Http("timeout".into()).is_recoverable());
    }

    #[test]
    fn test_partial_data_message() {
        let err = DataError::PartialData {
            missing: vec!["TLT".into(), "SHY".into()],
        };
        assert_eq!(err.to_string(), "Partial data: no quote for TLT, SHY");
    }
}
