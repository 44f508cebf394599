//! Rate sheet and pivot-currency math
//!
//! The rate source quotes every supported currency against a single pivot
//! (USD). A cross-rate between two non-pivot currencies is derived by going
//! through the pivot: amount / from_rate * to_rate.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::CurrencyCode;

use super::error::FxError;
use super::Conversion;

/// A snapshot of quotes against a pivot currency.
///
/// Quotes are keyed the way currencylayer-style sources key them:
/// `"USDNGN" -> 1500.00` means 1 USD buys 1500 NGN.
#[derive(Debug, Clone)]
pub struct RateSheet {
    pivot: CurrencyCode,
    quotes: HashMap<String, Decimal>,
}

impl RateSheet {
    /// Build a sheet from a pivot currency and raw quotes map.
    pub fn new(pivot: CurrencyCode, quotes: HashMap<String, Decimal>) -> Self {
        Self { pivot, quotes }
    }

    /// Convenience constructor from (code, rate) pairs quoted against USD.
    pub fn usd_pivot(pairs: &[(&str, Decimal)]) -> Self {
        let pivot = CurrencyCode::new("USD").expect("USD is a valid code");
        let quotes = pairs
            .iter()
            .map(|(code, rate)| (format!("{}{}", pivot, code.to_ascii_uppercase()), *rate))
            .collect();
        Self { pivot, quotes }
    }

    /// The pivot currency of this sheet.
    pub fn pivot(&self) -> &CurrencyCode {
        &self.pivot
    }

    /// Rate of `code` against the pivot; identity for the pivot itself.
    fn pivot_rate(&self, code: &CurrencyCode) -> Option<Decimal> {
        if code == &self.pivot {
            return Some(Decimal::ONE);
        }
        self.quotes
            .get(&format!("{}{}", self.pivot, code))
            .copied()
            .filter(|r| !r.is_zero())
    }

    /// Cross-rate from one currency to another through the pivot.
    pub fn cross_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, FxError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        let unavailable = || FxError::RateUnavailable {
            from: from.clone(),
            to: to.clone(),
        };

        let from_rate = self.pivot_rate(from).ok_or_else(unavailable)?;
        let to_rate = self.pivot_rate(to).ok_or_else(unavailable)?;

        Ok(to_rate / from_rate)
    }

    /// Convert an amount between two currencies on this sheet.
    /// The converted amount is rounded to 2 decimal places.
    pub fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Conversion, FxError> {
        let rate = self.cross_rate(from, to)?;
        Ok(Conversion {
            amount: (amount * rate).round_dp(2),
            rate,
        })
    }
}
