//! Ledger entry types
//!
//! An entry is an immutable record of one balance-affecting event against
//! one wallet.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{Amount, CurrencyCode};

/// Whether an entry adds to or subtracts from its wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(Direction::Credit),
            "debit" => Ok(Direction::Debit),
            other => Err(format!("unknown direction: {other:?}")),
        }
    }
}

/// Settlement status of an entry. The engine only ever writes `Completed`;
/// the enum mirrors the stored column for statement/export use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Completed,
    Failed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Completed => "completed",
            EntryStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EntryStatus::Pending),
            "completed" => Ok(EntryStatus::Completed),
            "failed" => Ok(EntryStatus::Failed),
            other => Err(format!("unknown entry status: {other:?}")),
        }
    }
}

/// A persisted ledger entry. Immutable after creation.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub direction: Direction,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub status: EntryStatus,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// An entry about to be written. Constructed by the engine only.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub wallet_id: Uuid,
    pub direction: Direction,
    pub amount: Amount,
    pub currency: CurrencyCode,
    pub description: String,
    pub status: EntryStatus,
}

impl NewEntry {
    /// A completed entry, the only status the engine writes.
    pub fn completed(
        wallet_id: Uuid,
        direction: Direction,
        amount: Amount,
        currency: CurrencyCode,
        description: impl Into<String>,
    ) -> Self {
        Self {
            wallet_id,
            direction,
            amount,
            currency,
            description: description.into(),
            status: EntryStatus::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_round_trip() {
        assert_eq!("credit".parse::<Direction>().unwrap(), Direction::Credit);
        assert_eq!("debit".parse::<Direction>().unwrap(), Direction::Debit);
        assert_eq!(Direction::Credit.as_str(), "credit");
        assert!("CREDIT".parse::<Direction>().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [EntryStatus::Pending, EntryStatus::Completed, EntryStatus::Failed] {
            assert_eq!(status.as_str().parse::<EntryStatus>().unwrap(), status);
        }
        assert!("settled".parse::<EntryStatus>().is_err());
    }

    #[test]
    fn test_new_entry_completed() {
        let entry = NewEntry::completed(
            Uuid::new_v4(),
            Direction::Credit,
            Amount::from_integer(10).unwrap(),
            CurrencyCode::new("USD").unwrap(),
            "Account funded via external source",
        );

        assert_eq!(entry.status, EntryStatus::Completed);
        assert_eq!(entry.direction, Direction::Credit);
    }
}
