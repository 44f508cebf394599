//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use thiserror::Error;

use super::currency::CurrencyCode;

/// Domain-specific errors
///
/// These errors represent business rule violations and ledger invariant
/// failures. They are independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid amount (zero, negative, malformed, or exceeds limit)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Required field absent from the request
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The user has no wallet in the given currency
    #[error("No {currency} wallet found for this user")]
    WalletNotFound { currency: CurrencyCode },

    /// The recipient wallet does not exist
    #[error("Recipient wallet not found: {0}")]
    RecipientNotFound(String),

    /// Insufficient balance for a debit operation
    #[error("Insufficient funds in {currency} wallet: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
        currency: CurrencyCode,
    },

    /// Conversion between identical currencies
    #[error("Cannot convert to the same currency")]
    SameCurrency,

    /// A wallet for this (user, currency) pair already exists
    #[error("A wallet with {0} already exists")]
    DuplicateWallet(CurrencyCode),

    /// Statement window where start is after end
    #[error("Invalid date range: start date must not be after end date")]
    InvalidDateRange,
}

impl DomainError {
    /// Create an insufficient funds error
    pub fn insufficient_funds(
        required: Decimal,
        available: Decimal,
        currency: CurrencyCode,
    ) -> Self {
        Self::InsufficientFunds {
            required,
            available,
            currency,
        }
    }

    /// Check if this is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::DuplicateWallet(_))
    }

    /// Check if this is a not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::WalletNotFound { .. } | Self::RecipientNotFound(_)
        )
    }
}
