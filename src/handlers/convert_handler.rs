//! Convert Handler
//!
//! Moves money between two of the same user's wallets, converting
//! currency. The destination wallet is created on demand, unlike fund
//! and withdraw, which require an existing wallet.

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::{Amount, CurrencyCode, DomainError, OperationContext};
use crate::error::AppError;
use crate::fx::CurrencyConverter;
use crate::ledger::{Direction, NewEntry, TransactionLog};
use crate::wallet::WalletStore;

use super::{ConvertCommand, ConvertResult};

/// Handler for same-user currency conversion
pub struct ConvertHandler {
    wallets: WalletStore,
    log: TransactionLog,
    converter: Arc<dyn CurrencyConverter>,
    pool: PgPool,
}

impl ConvertHandler {
    pub fn new(pool: PgPool, converter: Arc<dyn CurrencyConverter>) -> Self {
        Self {
            wallets: WalletStore::new(pool.clone()),
            log: TransactionLog::new(pool.clone()),
            converter,
            pool,
        }
    }

    /// Execute the convert command
    pub async fn execute(
        &self,
        command: ConvertCommand,
        context: &OperationContext,
    ) -> Result<ConvertResult, AppError> {
        let amount_raw = command.amount.ok_or(DomainError::MissingField("amount"))?;
        let from_raw = command
            .from_currency
            .ok_or(DomainError::MissingField("from_currency"))?;
        let to_raw = command
            .to_currency
            .ok_or(DomainError::MissingField("to_currency"))?;

        let amount: Amount = amount_raw
            .parse()
            .map_err(|e| DomainError::InvalidAmount(format!("{}", e)))?;
        let from: CurrencyCode = from_raw
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("{}", e)))?;
        let to: CurrencyCode = to_raw
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("{}", e)))?;

        if from == to {
            return Err(DomainError::SameCurrency.into());
        }

        let source = self
            .wallets
            .find(command.user_id, &from)
            .await?
            .ok_or(DomainError::WalletNotFound {
                currency: from.clone(),
            })?;

        if source.balance < amount.value() {
            return Err(
                DomainError::insufficient_funds(amount.value(), source.balance, from).into(),
            );
        }

        // Destination is created lazily; an empty wallet left behind by a
        // later failure is indistinguishable from a balance query's
        // get-or-create
        let (destination, _) = self.wallets.get_or_create(command.user_id, &to).await?;

        // Converter runs before the mutating transaction opens
        let conversion = self
            .converter
            .convert(amount.value(), &from, &to)
            .await?;

        let credited = Amount::new(conversion.amount)
            .map_err(|e| DomainError::InvalidAmount(format!("converted amount: {}", e)))?;

        let mut tx = self.pool.begin().await?;

        self.wallets.decrement(&mut tx, source.id, &amount).await?;
        self.wallets
            .increment(&mut tx, destination.id, &credited)
            .await?;

        let debit = self
            .log
            .record(
                &mut tx,
                NewEntry::completed(
                    source.id,
                    Direction::Debit,
                    amount.clone(),
                    from.clone(),
                    format!("Conversion of {} {} to {}", amount, from, to),
                ),
            )
            .await?;
        self.log
            .record(
                &mut tx,
                NewEntry::completed(
                    destination.id,
                    Direction::Credit,
                    credited,
                    to.clone(),
                    format!("Received from conversion of {} {}", amount, from),
                ),
            )
            .await?;

        tx.commit().await?;

        // Effective rate reported at exactly 6 decimal places
        let mut rate = conversion.amount / amount.value();
        rate.rescale(6);

        tracing::info!(
            transaction_id = %debit.id,
            user_id = %command.user_id,
            amount = %amount,
            from = %from,
            to = %to,
            %rate,
            correlation_id = ?context.correlation_id,
            "Funds converted"
        );

        Ok(ConvertResult {
            transaction_id: debit.id,
            conversion_date: debit.created_at,
            amount_debited: amount.value(),
            from_currency: from,
            amount_credited: conversion.amount,
            to_currency: to,
            rate,
        })
    }
}
