//! Wallet Store
//!
//! Durable CRUD for wallet rows plus the atomic increment/decrement
//! primitives. This is the only code that writes the `wallets` table;
//! balance mutations require a transaction handle owned by the caller.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::{Amount, CurrencyCode};

use super::WalletStoreError;

/// A per-user, per-currency balance record.
#[derive(Debug, Clone)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub currency: CurrencyCode,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

type WalletRow = (Uuid, Uuid, String, Decimal, DateTime<Utc>, DateTime<Utc>);

impl Wallet {
    fn from_row(row: WalletRow) -> Result<Self, WalletStoreError> {
        let (id, user_id, currency, balance, created_at, updated_at) = row;
        let currency = currency
            .parse::<CurrencyCode>()
            .map_err(|_| WalletStoreError::Database(sqlx::Error::Decode(
                format!("invalid currency code in wallet {}: {:?}", id, currency).into(),
            )))?;
        Ok(Self {
            id,
            user_id,
            currency,
            balance,
            created_at,
            updated_at,
        })
    }
}

const WALLET_COLUMNS: &str = "id, user_id, currency, balance, created_at, updated_at";

/// Store for wallet rows
#[derive(Debug, Clone)]
pub struct WalletStore {
    pool: PgPool,
}

impl WalletStore {
    /// Create a new WalletStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the wallet for (user, currency), creating a zero-balance one
    /// if absent. The unique (user_id, currency) constraint arbitrates
    /// concurrent creation: the loser of the race falls through to the
    /// select and sees the winner's row.
    ///
    /// The boolean is `true` when this call created the wallet.
    pub async fn get_or_create(
        &self,
        user_id: Uuid,
        currency: &CurrencyCode,
    ) -> Result<(Wallet, bool), WalletStoreError> {
        let inserted: Option<WalletRow> = sqlx::query_as(&format!(
            r#"
            INSERT INTO wallets (id, user_id, currency, balance)
            VALUES ($1, $2, $3, 0)
            ON CONFLICT (user_id, currency) DO NOTHING
            RETURNING {WALLET_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(currency.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            let wallet = Wallet::from_row(row)?;
            tracing::info!(
                wallet_id = %wallet.id,
                user_id = %user_id,
                currency = %currency,
                "Wallet created"
            );
            return Ok((wallet, true));
        }

        // Lost the race or the wallet already existed
        let existing = self.find(user_id, currency).await?;
        existing
            .map(|w| (w, false))
            .ok_or(WalletStoreError::Database(sqlx::Error::RowNotFound))
    }

    /// Find the wallet for (user, currency).
    pub async fn find(
        &self,
        user_id: Uuid,
        currency: &CurrencyCode,
    ) -> Result<Option<Wallet>, WalletStoreError> {
        let row: Option<WalletRow> = sqlx::query_as(&format!(
            r#"
            SELECT {WALLET_COLUMNS}
            FROM wallets
            WHERE user_id = $1 AND currency = $2
            "#,
        ))
        .bind(user_id)
        .bind(currency.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Wallet::from_row).transpose()
    }

    /// Find a wallet by its id.
    pub async fn find_by_id(&self, wallet_id: Uuid) -> Result<Option<Wallet>, WalletStoreError> {
        let row: Option<WalletRow> = sqlx::query_as(&format!(
            r#"
            SELECT {WALLET_COLUMNS}
            FROM wallets
            WHERE id = $1
            "#,
        ))
        .bind(wallet_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Wallet::from_row).transpose()
    }

    /// All wallets belonging to a user.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Wallet>, WalletStoreError> {
        let rows: Vec<WalletRow> = sqlx::query_as(&format!(
            r#"
            SELECT {WALLET_COLUMNS}
            FROM wallets
            WHERE user_id = $1
            ORDER BY currency ASC
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Wallet::from_row).collect()
    }

    /// Add to a wallet balance inside the caller's transaction.
    /// Returns the new balance.
    pub async fn increment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wallet_id: Uuid,
        amount: &Amount,
    ) -> Result<Decimal, WalletStoreError> {
        let new_balance: Option<Decimal> = sqlx::query_scalar(
            r#"
            UPDATE wallets
            SET balance = balance + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING balance
            "#,
        )
        .bind(wallet_id)
        .bind(amount.value())
        .fetch_optional(&mut **tx)
        .await?;

        new_balance.ok_or(WalletStoreError::NotFound(wallet_id))
    }

    /// Subtract from a wallet balance inside the caller's transaction.
    /// Returns the new balance.
    ///
    /// The row is read with `FOR UPDATE` so concurrent decrements against
    /// the same wallet serialize; the balance check happens against the
    /// locked row, and the update carries a `balance >= amount` guard as
    /// a second line of defense.
    pub async fn decrement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wallet_id: Uuid,
        amount: &Amount,
    ) -> Result<Decimal, WalletStoreError> {
        let available: Option<Decimal> = sqlx::query_scalar(
            r#"
            SELECT balance FROM wallets WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(wallet_id)
        .fetch_optional(&mut **tx)
        .await?;

        let available = available.ok_or(WalletStoreError::NotFound(wallet_id))?;

        if available < amount.value() {
            return Err(WalletStoreError::InsufficientBalance {
                required: amount.value(),
                available,
            });
        }

        let new_balance: Option<Decimal> = sqlx::query_scalar(
            r#"
            UPDATE wallets
            SET balance = balance - $2, updated_at = NOW()
            WHERE id = $1 AND balance >= $2
            RETURNING balance
            "#,
        )
        .bind(wallet_id)
        .bind(amount.value())
        .fetch_optional(&mut **tx)
        .await?;

        new_balance.ok_or(WalletStoreError::InsufficientBalance {
            required: amount.value(),
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_from_row() {
        let now = Utc::now();
        let row = (
            Uuid::new_v4(),
            Uuid::new_v4(),
            "USD".to_string(),
            Decimal::new(10050, 2),
            now,
            now,
        );

        let wallet = Wallet::from_row(row).unwrap();
        assert_eq!(wallet.currency.as_str(), "USD");
        assert_eq!(wallet.balance, Decimal::new(10050, 2));
    }

    #[test]
    fn test_wallet_from_row_bad_currency() {
        let now = Utc::now();
        let row = (
            Uuid::new_v4(),
            Uuid::new_v4(),
            "not-a-code".to_string(),
            Decimal::ZERO,
            now,
            now,
        );

        assert!(Wallet::from_row(row).is_err());
    }
}
