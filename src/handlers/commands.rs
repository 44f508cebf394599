//! Command definitions
//!
//! Commands represent intentions to move money through the ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::CurrencyCode;
use crate::ledger::EntryStatus;

/// Command to fund a wallet from an external source (simulated)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundCommand {
    /// Owner of the wallet being funded
    pub user_id: Uuid,
    /// Amount to credit (as string for precise decimal)
    pub amount: String,
    /// Currency of the target wallet
    pub currency: String,
}

impl FundCommand {
    pub fn new(user_id: Uuid, amount: String, currency: String) -> Self {
        Self {
            user_id,
            amount,
            currency,
        }
    }
}

/// Command to withdraw to an external destination (simulated)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawCommand {
    pub user_id: Uuid,
    /// Amount to debit (as string for precise decimal)
    pub amount: String,
    pub currency: String,
}

impl WithdrawCommand {
    pub fn new(user_id: Uuid, amount: String, currency: String) -> Self {
        Self {
            user_id,
            amount,
            currency,
        }
    }
}

/// Where a peer transfer lands: an internal wallet or an external
/// destination (bank account etc., payout simulated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientKind {
    Wallet,
    External,
}

impl fmt::Display for RecipientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipientKind::Wallet => f.write_str("wallet"),
            RecipientKind::External => f.write_str("external"),
        }
    }
}

/// Command to send money to another account, converting currency on the
/// way. Fields arrive optional so the handler can fail fast with a
/// precise missing-field error before touching any wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMoneyCommand {
    /// Authenticated sender
    pub sender_id: Uuid,
    /// Amount to debit from the sender (as string for precise decimal)
    pub amount: Option<String>,
    /// Kind of destination account
    pub account_type: Option<RecipientKind>,
    /// Destination identifier (wallet id for internal transfers)
    pub account_id: Option<String>,
    /// Sender-side currency
    pub currency: Option<String>,
    /// Currency the destination receives
    pub receiving_currency: Option<String>,
    /// Optional human-readable note; a default is generated when absent
    pub description: Option<String>,
}

impl SendMoneyCommand {
    pub fn new(sender_id: Uuid) -> Self {
        Self {
            sender_id,
            amount: None,
            account_type: None,
            account_id: None,
            currency: None,
            receiving_currency: None,
            description: None,
        }
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_recipient(mut self, kind: RecipientKind, account_id: impl Into<String>) -> Self {
        self.account_type = Some(kind);
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_currencies(
        mut self,
        currency: impl Into<String>,
        receiving_currency: impl Into<String>,
    ) -> Self {
        self.currency = Some(currency.into());
        self.receiving_currency = Some(receiving_currency.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Command to convert funds between two of the same user's wallets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertCommand {
    pub user_id: Uuid,
    /// Amount to convert (as string for precise decimal)
    pub amount: Option<String>,
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
}

impl ConvertCommand {
    pub fn new(
        user_id: Uuid,
        amount: impl Into<String>,
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            amount: Some(amount.into()),
            from_currency: Some(from_currency.into()),
            to_currency: Some(to_currency.into()),
        }
    }
}

/// Result of a successful fund operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundResult {
    pub wallet_id: Uuid,
    pub balance: Decimal,
    pub currency: CurrencyCode,
}

/// Result of a successful withdrawal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResult {
    pub wallet_id: Uuid,
    pub balance: Decimal,
    pub currency: CurrencyCode,
}

/// Result of a successful send, shaped for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMoneyResult {
    /// The sender's debit entry
    pub transaction_id: Uuid,
    pub transaction_date: DateTime<Utc>,
    pub sender_id: Uuid,
    pub amount_sent: Decimal,
    pub sending_currency: CurrencyCode,
    pub amount_received: Decimal,
    pub receiving_currency: CurrencyCode,
    /// Effective rate, 6 decimal places
    pub rate: Decimal,
    pub description: String,
    pub status: EntryStatus,
}

/// Result of a successful conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResult {
    /// The primary (debit) entry
    pub transaction_id: Uuid,
    pub conversion_date: DateTime<Utc>,
    pub amount_debited: Decimal,
    pub from_currency: CurrencyCode,
    pub amount_credited: Decimal,
    pub to_currency: CurrencyCode,
    /// Effective rate, 6 decimal places
    pub rate: Decimal,
}
