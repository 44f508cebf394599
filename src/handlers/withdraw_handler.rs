//! Withdraw Handler
//!
//! Debits a wallet toward a simulated external payout.

use sqlx::PgPool;

use crate::domain::{Amount, CurrencyCode, DomainError, OperationContext};
use crate::error::AppError;
use crate::ledger::{Direction, NewEntry, TransactionLog};
use crate::wallet::WalletStore;

use super::{WithdrawCommand, WithdrawResult};

/// Handler for withdrawals
pub struct WithdrawHandler {
    wallets: WalletStore,
    log: TransactionLog,
    pool: PgPool,
}

impl WithdrawHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            wallets: WalletStore::new(pool.clone()),
            log: TransactionLog::new(pool.clone()),
            pool,
        }
    }

    /// Execute the withdraw command
    pub async fn execute(
        &self,
        command: WithdrawCommand,
        context: &OperationContext,
    ) -> Result<WithdrawResult, AppError> {
        let amount: Amount = command
            .amount
            .parse()
            .map_err(|e| DomainError::InvalidAmount(format!("{}", e)))?;
        let currency: CurrencyCode = command
            .currency
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("{}", e)))?;

        let wallet = self
            .wallets
            .find(command.user_id, &currency)
            .await?
            .ok_or(DomainError::WalletNotFound {
                currency: currency.clone(),
            })?;

        // Pre-check against the last-read balance; the store re-validates
        // against the locked row inside the transaction
        if wallet.balance < amount.value() {
            return Err(DomainError::insufficient_funds(
                amount.value(),
                wallet.balance,
                currency,
            )
            .into());
        }

        let mut tx = self.pool.begin().await?;

        let balance = self.wallets.decrement(&mut tx, wallet.id, &amount).await?;
        self.log
            .record(
                &mut tx,
                NewEntry::completed(
                    wallet.id,
                    Direction::Debit,
                    amount.clone(),
                    currency.clone(),
                    "Withdrawal to external account",
                ),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            wallet_id = %wallet.id,
            user_id = %command.user_id,
            amount = %amount,
            currency = %currency,
            correlation_id = ?context.correlation_id,
            "Withdrawal initiated"
        );

        Ok(WithdrawResult {
            wallet_id: wallet.id,
            balance,
            currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_withdraw_command() {
        let cmd = WithdrawCommand::new(Uuid::new_v4(), "40.00".to_string(), "usd".to_string());
        assert_eq!(cmd.amount, "40.00");
        assert_eq!(cmd.currency, "usd");
    }
}
