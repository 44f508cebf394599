//! Transaction Log
//!
//! Append-only persistence for ledger entries; read access for statements
//! and summaries. Writes require a transaction handle owned by the caller
//! so an entry commits together with the balance mutation it records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::CurrencyCode;

use super::entries::{Direction, EntryStatus, LedgerEntry, NewEntry};

/// Errors that can occur in the transaction log
#[derive(Debug, thiserror::Error)]
pub enum LedgerLogError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row failed to decode into a ledger entry
    #[error("Invalid ledger row {id}: {reason}")]
    InvalidRow { id: Uuid, reason: String },
}

type EntryRow = (
    Uuid,
    Uuid,
    String,
    Decimal,
    String,
    String,
    String,
    DateTime<Utc>,
);

fn entry_from_row(row: EntryRow) -> Result<LedgerEntry, LedgerLogError> {
    let (id, wallet_id, direction, amount, currency, status, description, created_at) = row;

    let invalid = |reason: String| LedgerLogError::InvalidRow { id, reason };

    Ok(LedgerEntry {
        id,
        wallet_id,
        direction: direction.parse::<Direction>().map_err(invalid)?,
        amount,
        currency: currency
            .parse::<CurrencyCode>()
            .map_err(|e| invalid(e.to_string()))?,
        status: status.parse::<EntryStatus>().map_err(invalid)?,
        description,
        created_at,
    })
}

/// Append-only log of balance mutations
#[derive(Debug, Clone)]
pub struct TransactionLog {
    pool: PgPool,
}

impl TransactionLog {
    /// Create a new TransactionLog with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one entry inside the caller's transaction.
    pub async fn record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: NewEntry,
    ) -> Result<LedgerEntry, LedgerLogError> {
        let id = Uuid::new_v4();

        let created_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (id, wallet_id, direction, amount, currency, status, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING created_at
            "#,
        )
        .bind(id)
        .bind(entry.wallet_id)
        .bind(entry.direction.as_str())
        .bind(entry.amount.value())
        .bind(entry.currency.as_str())
        .bind(entry.status.as_str())
        .bind(&entry.description)
        .fetch_one(&mut **tx)
        .await?;

        Ok(LedgerEntry {
            id,
            wallet_id: entry.wallet_id,
            direction: entry.direction,
            amount: entry.amount.value(),
            currency: entry.currency,
            status: entry.status,
            description: entry.description,
            created_at,
        })
    }

    /// Entries for one wallet within a date window, newest first.
    /// The query is stateless and re-runnable.
    pub async fn list_by_wallet(
        &self,
        wallet_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<LedgerEntry>, LedgerLogError> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT id, wallet_id, direction, amount, currency, status, description, created_at
            FROM transactions
            WHERE wallet_id = $1 AND created_at BETWEEN $2 AND $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(wallet_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(entry_from_row).collect()
    }

    /// Count of entries for one wallet (diagnostics and tests).
    pub async fn count_by_wallet(&self, wallet_id: Uuid) -> Result<i64, LedgerLogError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE wallet_id = $1")
                .bind(wallet_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Sum of entry amounts across a set of wallets in one direction.
    /// Used for income/expense aggregation.
    pub async fn sum_by_direction(
        &self,
        wallet_ids: &[Uuid],
        direction: Direction,
    ) -> Result<Decimal, LedgerLogError> {
        if wallet_ids.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let sum: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE wallet_id = ANY($1) AND direction = $2
            "#,
        )
        .bind(wallet_ids)
        .bind(direction.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(sum)
    }
}
