//! Query handlers
//!
//! Thin read paths: account statement and financial summary. Balance
//! lookup (get-or-create) goes straight through the wallet store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CurrencyCode, DomainError};
use crate::error::AppError;
use crate::ledger::{Direction, LedgerEntry, TransactionLog};
use crate::wallet::WalletStore;

/// Statement request: one wallet, one date window
#[derive(Debug, Clone)]
pub struct StatementQuery {
    pub user_id: Uuid,
    pub currency: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Handler for account statements
pub struct StatementHandler {
    wallets: WalletStore,
    log: TransactionLog,
}

impl StatementHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            wallets: WalletStore::new(pool.clone()),
            log: TransactionLog::new(pool),
        }
    }

    /// Entries for the user's wallet in the window, newest first.
    pub async fn execute(&self, query: StatementQuery) -> Result<Vec<LedgerEntry>, AppError> {
        let currency: CurrencyCode = query
            .currency
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("{}", e)))?;

        if query.start_date > query.end_date {
            return Err(DomainError::InvalidDateRange.into());
        }

        let wallet = self
            .wallets
            .find(query.user_id, &currency)
            .await?
            .ok_or(DomainError::WalletNotFound { currency })?;

        let entries = self
            .log
            .list_by_wallet(wallet.id, query.start_date, query.end_date)
            .await?;

        Ok(entries)
    }
}

/// Credit/debit totals across all of a user's wallets
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
}

/// Handler for the income/expense summary
pub struct SummaryHandler {
    wallets: WalletStore,
    log: TransactionLog,
}

impl SummaryHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            wallets: WalletStore::new(pool.clone()),
            log: TransactionLog::new(pool),
        }
    }

    pub async fn execute(&self, user_id: Uuid) -> Result<FinancialSummary, AppError> {
        let wallets = self.wallets.list_for_user(user_id).await?;
        let wallet_ids: Vec<Uuid> = wallets.iter().map(|w| w.id).collect();

        let total_income = self
            .log
            .sum_by_direction(&wallet_ids, Direction::Credit)
            .await?;
        let total_expenses = self
            .log
            .sum_by_direction(&wallet_ids, Direction::Debit)
            .await?;

        Ok(FinancialSummary {
            total_income,
            total_expenses,
        })
    }
}
