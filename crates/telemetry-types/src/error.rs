//! Input Error Types

use thiserror::Error;

/// Errors raised while validating an incoming tick
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// NaN or infinite value
    #[error("{field} is not finite")]
    NonFinite { field: &'static str },

    /// Tick timestamp went backwards
    #[error("timestamp {current} precedes previous tick at {previous}")]
    NonMonotonic { previous: f64, current: f64 },

    /// Button or key hold duration below zero
    #[error("{field} duration {value} is negative")]
    NegativeDuration { field: &'static str, value: f64 },
}
