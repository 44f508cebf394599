//! Fund Handler
//!
//! Credits a wallet from a simulated external payment source.

use sqlx::PgPool;

use crate::domain::{Amount, CurrencyCode, DomainError, OperationContext};
use crate::error::AppError;
use crate::ledger::{Direction, NewEntry, TransactionLog};
use crate::wallet::WalletStore;

use super::{FundCommand, FundResult};

/// Handler for funding a wallet
pub struct FundHandler {
    wallets: WalletStore,
    log: TransactionLog,
    pool: PgPool,
}

impl FundHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            wallets: WalletStore::new(pool.clone()),
            log: TransactionLog::new(pool.clone()),
            pool,
        }
    }

    /// Execute the fund command
    pub async fn execute(
        &self,
        command: FundCommand,
        context: &OperationContext,
    ) -> Result<FundResult, AppError> {
        // Parse and validate inputs before touching the database
        let amount: Amount = command
            .amount
            .parse()
            .map_err(|e| DomainError::InvalidAmount(format!("{}", e)))?;
        let currency: CurrencyCode = command
            .currency
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("{}", e)))?;

        // Funding does not auto-create: the wallet must already exist
        let wallet = self
            .wallets
            .find(command.user_id, &currency)
            .await?
            .ok_or(DomainError::WalletNotFound {
                currency: currency.clone(),
            })?;

        // Balance change and ledger entry commit together or not at all
        let mut tx = self.pool.begin().await?;

        let balance = self.wallets.increment(&mut tx, wallet.id, &amount).await?;
        self.log
            .record(
                &mut tx,
                NewEntry::completed(
                    wallet.id,
                    Direction::Credit,
                    amount.clone(),
                    currency.clone(),
                    "Account funded via external source",
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
            "Account funded"
        );

        Ok(FundResult {
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
    fn test_fund_command() {
        let user_id = Uuid::new_v4();
        let cmd = FundCommand::new(user_id, "100.00".to_string(), "USD".to_string());

        assert_eq!(cmd.user_id, user_id);
        assert_eq!(cmd.amount, "100.00");
        assert_eq!(cmd.currency, "USD");
    }
}
