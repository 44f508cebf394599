//! Wallet Store Errors

use rust_decimal::Decimal;
use uuid::Uuid;

/// Errors that can occur in the wallet store
#[derive(Debug, thiserror::Error)]
pub enum WalletStoreError {
    /// Wallet row does not exist
    #[error("Wallet not found: {0}")]
    NotFound(Uuid),

    /// A decrement would drive the balance negative
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl WalletStoreError {
    /// Check if this error is the balance invariant firing
    pub fn is_insufficient_balance(&self) -> bool {
        matches!(self, WalletStoreError::InsufficientBalance { .. })
    }
}
