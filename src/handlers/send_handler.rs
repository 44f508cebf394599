//! Send Handler
//!
//! Moves money from the sender's wallet to another account, converting
//! currency on the way. Internal recipients are credited atomically with
//! the sender's debit; external payouts are simulated and leave only the
//! sender's debit entry.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Amount, CurrencyCode, DomainError, OperationContext};
use crate::error::AppError;
use crate::fx::CurrencyConverter;
use crate::ledger::{Direction, NewEntry, TransactionLog};
use crate::wallet::WalletStore;

use super::{RecipientKind, SendMoneyCommand, SendMoneyResult};

/// Handler for peer transfers
pub struct SendHandler {
    wallets: WalletStore,
    log: TransactionLog,
    converter: Arc<dyn CurrencyConverter>,
    pool: PgPool,
}

impl SendHandler {
    pub fn new(pool: PgPool, converter: Arc<dyn CurrencyConverter>) -> Self {
        Self {
            wallets: WalletStore::new(pool.clone()),
            log: TransactionLog::new(pool.clone()),
            converter,
            pool,
        }
    }

    /// Execute the send command
    pub async fn execute(
        &self,
        command: SendMoneyCommand,
        context: &OperationContext,
    ) -> Result<SendMoneyResult, AppError> {
        // Fail fast: every required field checked before any wallet is read
        let amount_raw = command.amount.ok_or(DomainError::MissingField("amount"))?;
        let kind = command
            .account_type
            .ok_or(DomainError::MissingField("account_type"))?;
        let account_id = command
            .account_id
            .ok_or(DomainError::MissingField("account_id"))?;
        let currency_raw = command
            .currency
            .ok_or(DomainError::MissingField("currency"))?;
        let receiving_raw = command
            .receiving_currency
            .ok_or(DomainError::MissingField("receiving_currency"))?;

        let amount: Amount = amount_raw
            .parse()
            .map_err(|e| DomainError::InvalidAmount(format!("{}", e)))?;
        let currency: CurrencyCode = currency_raw
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("{}", e)))?;
        let receiving: CurrencyCode = receiving_raw
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("{}", e)))?;

        let sender_wallet = self
            .wallets
            .find(command.sender_id, &currency)
            .await?
            .ok_or(DomainError::WalletNotFound {
                currency: currency.clone(),
            })?;

        if sender_wallet.balance < amount.value() {
            return Err(DomainError::insufficient_funds(
                amount.value(),
                sender_wallet.balance,
                currency,
            )
            .into());
        }

        // Resolve the converted amount before opening the mutating
        // transaction: a converter failure must abort with zero wallet
        // mutations, and no wallet-row lock may be held across the call
        let conversion = self
            .converter
            .convert(amount.value(), &currency, &receiving)
            .await?;

        let credited = Amount::new(conversion.amount)
            .map_err(|e| DomainError::InvalidAmount(format!("converted amount: {}", e)))?;

        let mut tx = self.pool.begin().await?;

        self.wallets
            .decrement(&mut tx, sender_wallet.id, &amount)
            .await?;

        match kind {
            RecipientKind::Wallet => {
                let recipient = match account_id.parse::<Uuid>() {
                    Ok(id) => self.wallets.find_by_id(id).await?,
                    Err(_) => None,
                }
                .ok_or_else(|| DomainError::RecipientNotFound(account_id.clone()))?;

                // The credit entry's currency must match the wallet it
                // lands on
                if recipient.currency != receiving {
                    return Err(AppError::InvalidRequest(format!(
                        "Recipient wallet holds {}, not {}",
                        recipient.currency, receiving
                    )));
                }

                self.wallets
                    .increment(&mut tx, recipient.id, &credited)
                    .await?;
                self.log
                    .record(
                        &mut tx,
                        NewEntry::completed(
                            recipient.id,
                            Direction::Credit,
                            credited.clone(),
                            receiving.clone(),
                            format!("Received from user ID {}", command.sender_id),
                        ),
                    )
                    .await?;
            }
            RecipientKind::External => {
                // External payout is out of scope: no second wallet
                // mutation, no balancing entry; only the sender gets a debit
                tracing::info!(
                    account_id = %account_id,
                    "Initiating external payout"
                );
            }
        }

        let description = command
            .description
            .unwrap_or_else(|| format!("Sent to {}: {}", kind, account_id));

        let debit = self
            .log
            .record(
                &mut tx,
                NewEntry::completed(
                    sender_wallet.id,
                    Direction::Debit,
                    amount.clone(),
                    currency.clone(),
                    description,
                ),
            )
            .await?;

        tx.commit().await?;

        // Effective rate reported at exactly 6 decimal places
        let mut rate = conversion.amount / amount.value();
        rate.rescale(6);

        tracing::info!(
            transaction_id = %debit.id,
            sender_id = %command.sender_id,
            amount = %amount,
            currency = %currency,
            receiving_currency = %receiving,
            %rate,
            recipient_kind = %kind,
            correlation_id = ?context.correlation_id,
            "Money sent"
        );

        Ok(SendMoneyResult {
            transaction_id: debit.id,
            transaction_date: debit.created_at,
            sender_id: command.sender_id,
            amount_sent: amount.value(),
            sending_currency: currency,
            amount_received: conversion.amount,
            receiving_currency: receiving,
            rate,
            description: debit.description,
            status: debit.status,
        })
    }
}
