//! API Routes
//!
//! HTTP endpoint definitions for the wallet ledger.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CurrencyCode, DomainError, OperationContext};
use crate::error::AppError;
use crate::fx::CurrencyConverter;
use crate::handlers::{
    ConvertCommand, ConvertHandler, FinancialSummary, FundCommand, FundHandler, RecipientKind,
    SendHandler, SendMoneyCommand, StatementHandler, StatementQuery, SummaryHandler,
    WithdrawCommand, WithdrawHandler,
};
use crate::ledger::{statement, LedgerEntry, StatementFormat};
use crate::wallet::WalletStore;

use super::middleware::AuthenticatedUser;

/// Shared application state: the connection pool and the rate source.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub converter: Arc<dyn CurrencyConverter>,
}

impl AppState {
    pub fn new(pool: PgPool, converter: Arc<dyn CurrencyConverter>) -> Self {
        Self { pool, converter }
    }
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub wallet_id: Uuid,
    pub balance: Decimal,
    pub currency: CurrencyCode,
}

#[derive(Debug, Deserialize)]
pub struct AddCurrencyRequest {
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct WalletResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub currency: CurrencyCode,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct FundRequest {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct FundResponse {
    pub wallet_id: Uuid,
    pub balance: Decimal,
    pub currency: CurrencyCode,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    pub wallet_id: Uuid,
    pub balance: Decimal,
    pub currency: CurrencyCode,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub account_type: Option<RecipientKind>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub receiving_currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub id: Uuid,
    pub transaction_date: DateTime<Utc>,
    pub user_id: Uuid,
    pub amount_sent: Decimal,
    pub sending_currency: CurrencyCode,
    pub amount_received: Decimal,
    pub receiving_currency: CurrencyCode,
    pub rate: Decimal,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub from_currency: Option<String>,
    #[serde(default)]
    pub to_currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub id: Uuid,
    pub conversion_date: DateTime<Utc>,
    pub amount_debited: Decimal,
    pub from_currency: CurrencyCode,
    pub amount_credited: Decimal,
    pub to_currency: CurrencyCode,
    pub rate: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct StatementParams {
    pub currency: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatementResponse {
    pub currency: String,
    pub entries: Vec<LedgerEntry>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Wallet reads
        .route("/wallet/balance", get(get_balance))
        .route("/wallet/statement", get(get_statement))
        .route("/wallet/summary", get(get_summary))
        // Wallet management
        .route("/wallet/currencies", post(add_currency))
        // Fund movement
        .route("/wallet/fund", post(fund_account))
        .route("/wallet/withdraw", post(withdraw_funds))
        .route("/wallet/send", post(send_money))
        .route("/wallet/convert", post(convert_funds))
}

// =========================================================================
// GET /wallet/balance
// =========================================================================

/// Get the balance for one currency, lazily creating the wallet
async fn get_balance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<BalanceQuery>,
) -> Result<(StatusCode, Json<BalanceResponse>), AppError> {
    let currency: CurrencyCode = query
        .currency
        .parse()
        .map_err(|e| AppError::InvalidRequest(format!("{}", e)))?;

    let store = WalletStore::new(state.pool);
    let (wallet, created) = store.get_or_create(user.user_id, &currency).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(BalanceResponse {
            wallet_id: wallet.id,
            balance: wallet.balance,
            currency: wallet.currency,
        }),
    ))
}

// =========================================================================
// POST /wallet/currencies
// =========================================================================

/// Explicitly open a wallet in a new currency
async fn add_currency(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<AddCurrencyRequest>,
) -> Result<(StatusCode, Json<WalletResponse>), AppError> {
    let currency: CurrencyCode = request
        .currency
        .parse()
        .map_err(|e| AppError::InvalidRequest(format!("{}", e)))?;

    let store = WalletStore::new(state.pool);
    let (wallet, created) = store.get_or_create(user.user_id, &currency).await?;

    if !created {
        return Err(DomainError::DuplicateWallet(currency).into());
    }

    Ok((
        StatusCode::CREATED,
        Json(WalletResponse {
            id: wallet.id,
            user_id: wallet.user_id,
            currency: wallet.currency,
            balance: wallet.balance,
            created_at: wallet.created_at,
        }),
    ))
}

// =========================================================================
// GET /wallet/statement
// =========================================================================

/// Account statement for one currency and date window
async fn get_statement(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<StatementParams>,
) -> Result<Response, AppError> {
    let format: StatementFormat = match params.format.as_deref() {
        Some(raw) => raw
            .parse()
            .map_err(|e: String| AppError::InvalidRequest(e))?,
        None => StatementFormat::default(),
    };

    let handler = StatementHandler::new(state.pool);
    let entries = handler
        .execute(StatementQuery {
            user_id: user.user_id,
            currency: params.currency.clone(),
            start_date: params.start_date,
            end_date: params.end_date,
        })
        .await?;

    match format {
        StatementFormat::Structured => Ok(Json(StatementResponse {
            currency: params.currency,
            entries,
        })
        .into_response()),
        StatementFormat::Tabular => {
            let csv = statement::render_csv(&entries);
            let disposition = format!(
                "attachment; filename=\"statement-{}-{}-to-{}.csv\"",
                params.currency,
                params.start_date.format("%Y-%m-%d"),
                params.end_date.format("%Y-%m-%d"),
            );
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response())
        }
    }
}

// =========================================================================
// GET /wallet/summary
// =========================================================================

/// Credit/debit totals across all of the user's wallets
async fn get_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<FinancialSummary>, AppError> {
    let handler = SummaryHandler::new(state.pool);
    let summary = handler.execute(user.user_id).await?;
    Ok(Json(summary))
}

// =========================================================================
// POST /wallet/fund
// =========================================================================

/// Fund a wallet from a simulated external source
async fn fund_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<FundRequest>,
) -> Result<Json<FundResponse>, AppError> {
    let handler = FundHandler::new(state.pool);

    let command = FundCommand::new(user.user_id, request.amount, request.currency);
    let result = handler.execute(command, &context).await?;

    Ok(Json(FundResponse {
        wallet_id: result.wallet_id,
        balance: result.balance,
        currency: result.currency,
    }))
}

// =========================================================================
// POST /wallet/withdraw
// =========================================================================

/// Withdraw toward a simulated external payout
async fn withdraw_funds(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<WithdrawResponse>, AppError> {
    let handler = WithdrawHandler::new(state.pool);

    let command = WithdrawCommand::new(user.user_id, request.amount, request.currency);
    let result = handler.execute(command, &context).await?;

    Ok(Json(WithdrawResponse {
        wallet_id: result.wallet_id,
        balance: result.balance,
        currency: result.currency,
    }))
}

// =========================================================================
// POST /wallet/send
// =========================================================================

/// Send money to another account, converting currency on the way
async fn send_money(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<SendRequest>,
) -> Result<(StatusCode, Json<SendResponse>), AppError> {
    let handler = SendHandler::new(state.pool, state.converter);

    let command = SendMoneyCommand {
        sender_id: user.user_id,
        amount: request.amount,
        account_type: request.account_type,
        account_id: request.account_id,
        currency: request.currency,
        receiving_currency: request.receiving_currency,
        description: request.description,
    };

    let result = handler.execute(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(SendResponse {
            id: result.transaction_id,
            transaction_date: result.transaction_date,
            user_id: result.sender_id,
            amount_sent: result.amount_sent,
            sending_currency: result.sending_currency,
            amount_received: result.amount_received,
            receiving_currency: result.receiving_currency,
            rate: result.rate,
            description: result.description,
            status: result.status.to_string(),
        }),
    ))
}

// =========================================================================
// POST /wallet/convert
// =========================================================================

/// Convert funds between two of the user's wallets
async fn convert_funds(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<ConvertRequest>,
) -> Result<(StatusCode, Json<ConvertResponse>), AppError> {
    let handler = ConvertHandler::new(state.pool, state.converter);

    let command = ConvertCommand {
        user_id: user.user_id,
        amount: request.amount,
        from_currency: request.from_currency,
        to_currency: request.to_currency,
    };

    let result = handler.execute(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(ConvertResponse {
            id: result.transaction_id,
            conversion_date: result.conversion_date,
            amount_debited: result.amount_debited,
            from_currency: result.from_currency,
            amount_credited: result.amount_credited,
            to_currency: result.to_currency,
            rate: result.rate,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_deserialize() {
        let json = r#"{
            "amount": "100.50",
            "account_type": "wallet",
            "account_id": "550e8400-e29b-41d4-a716-446655440002",
            "currency": "USD",
            "receiving_currency": "NGN",
            "description": "Rent"
        }"#;

        let request: SendRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount.as_deref(), Some("100.50"));
        assert_eq!(request.account_type, Some(RecipientKind::Wallet));
        assert_eq!(request.description.as_deref(), Some("Rent"));
    }

    #[test]
    fn test_send_request_missing_fields_default_to_none() {
        let request: SendRequest = serde_json::from_str("{}").unwrap();
        assert!(request.amount.is_none());
        assert!(request.account_type.is_none());
        assert!(request.receiving_currency.is_none());
    }

    #[test]
    fn test_convert_request_deserialize() {
        let json = r#"{"amount": "50", "from_currency": "USD", "to_currency": "EUR"}"#;
        let request: ConvertRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.from_currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_statement_params_deserialize() {
        let json = r#"{
            "currency": "USD",
            "start_date": "2026-01-01T00:00:00Z",
            "end_date": "2026-02-01T00:00:00Z",
            "format": "csv"
        }"#;

        let params: StatementParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.currency, "USD");
        assert_eq!(params.format.as_deref(), Some("csv"));
        assert!(params.start_date < params.end_date);
    }
}
