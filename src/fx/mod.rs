//! FX module
//!
//! The currency-conversion collaborator: a trait seam the ledger engine
//! calls through, a pivot-rate sheet, the HTTP rate-source client, and
//! deterministic mocks.

mod client;
mod error;
pub mod mock;
mod rates;

pub use client::LayerRateClient;
pub use error::FxError;
pub use rates::RateSheet;

use rust_decimal::Decimal;

use crate::domain::CurrencyCode;

/// Result of a currency conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Converted amount, rounded to 2 decimal places
    pub amount: Decimal,
    /// Cross-rate applied (target units per source unit)
    pub rate: Decimal,
}

impl Conversion {
    /// Identity conversion (same currency, rate 1).
    pub fn identity(amount: Decimal) -> Self {
        Self {
            amount,
            rate: Decimal::ONE,
        }
    }
}

/// External currency-conversion collaborator.
///
/// Implementations must be identity when `from == to` and must signal
/// [`FxError::RateUnavailable`] when a required cross-rate is missing.
/// The call is fallible, potentially slow I/O; the ledger engine never
/// holds a wallet-row lock across it.
#[async_trait::async_trait]
pub trait CurrencyConverter: Send + Sync {
    async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Conversion, FxError>;
}
