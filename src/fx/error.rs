//! FX Errors
//!
//! Error types for currency conversion and the external rate source.

use crate::domain::CurrencyCode;

/// Errors that can occur while converting between currencies
#[derive(Debug, thiserror::Error)]
pub enum FxError {
    /// A required cross-rate is missing from the rate sheet
    #[error("Conversion rate for {from} or {to} not available")]
    RateUnavailable {
        from: CurrencyCode,
        to: CurrencyCode,
    },

    /// The rate source answered but reported a failure
    #[error("Rate source error: {0}")]
    Api(String),

    /// The HTTP request to the rate source failed
    #[error("Rate source request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Rate source endpoint or credentials not configured
    #[error("Rate source not configured: missing {0}")]
    MissingConfig(&'static str),
}

impl FxError {
    /// Check if this error means a rate simply doesn't exist (as opposed
    /// to the source being unreachable)
    pub fn is_rate_unavailable(&self) -> bool {
        matches!(self, FxError::RateUnavailable { .. })
    }
}
