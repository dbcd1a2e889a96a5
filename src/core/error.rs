//! Error kinds shared by providers and the return calculator.

use thiserror::Error;

/// A data feed could not deliver usable data.
///
/// Raised for transport failures, timeouts, non-2xx responses and bodies
/// that are missing or malforming the expected fields.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{feed} data unavailable: {reason}")]
pub struct DataUnavailable {
    pub feed: &'static str,
    pub reason: String,
}

impl DataUnavailable {
    pub fn new(feed: &'static str, reason: impl Into<String>) -> Self {
        DataUnavailable {
            feed,
            reason: reason.into(),
        }
    }
}

/// Reasons the return calculator refuses to produce totals.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalculationError {
    #[error("cannot calculate: gold price unavailable")]
    PriceUnavailable,
    #[error("invalid amount {amount} for {leg}: amounts must be finite and non-negative")]
    InvalidAmount { leg: String, amount: f64 },
}
