//! Mock converters
//!
//! Deterministic converter implementations for tests and for running the
//! service without the external rate source.

use rust_decimal::Decimal;

use crate::domain::CurrencyCode;

use super::error::FxError;
use super::rates::RateSheet;
use super::{Conversion, CurrencyConverter};

/// Converter backed by a fixed in-memory rate sheet.
pub struct FixedRateConverter {
    sheet: RateSheet,
}

impl FixedRateConverter {
    pub fn new(sheet: RateSheet) -> Self {
        Self { sheet }
    }

    /// Sheet with USD-pivot quotes from (code, rate) pairs.
    pub fn with_usd_quotes(pairs: &[(&str, Decimal)]) -> Self {
        Self {
            sheet: RateSheet::usd_pivot(pairs),
        }
    }
}

#[async_trait::async_trait]
impl CurrencyConverter for FixedRateConverter {
    async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Conversion, FxError> {
        if from == to {
            return Ok(Conversion::identity(amount));
        }
        self.sheet.convert(amount, from, to)
    }
}

/// Converter that fails every non-identity conversion. Used to exercise
/// the rollback path of multi-wallet operations.
pub struct FailingConverter;

#[async_trait::async_trait]
impl CurrencyConverter for FailingConverter {
    async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Conversion, FxError> {
        if from == to {
            return Ok(Conversion::identity(amount));
        }
        Err(FxError::RateUnavailable {
            from: from.clone(),
            to: to.clone(),
        })
    }
}
