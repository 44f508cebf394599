//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing required header: {0}")]
    MissingHeader(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    // Collaborator / store errors
    #[error(transparent)]
    Fx(#[from] crate::fx::FxError),

    #[error(transparent)]
    WalletStore(#[from] crate::wallet::WalletStoreError),

    #[error(transparent)]
    LedgerLog(#[from] crate::ledger::LedgerLogError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }
            AppError::MissingHeader(header) => {
                (StatusCode::BAD_REQUEST, "missing_header", Some(header.clone()))
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(ref domain_err) => {
                use crate::domain::DomainError;
                match domain_err {
                    DomainError::InvalidAmount(msg) => {
                        (StatusCode::BAD_REQUEST, "invalid_amount", Some(msg.clone()))
                    }
                    DomainError::MissingField(field) => {
                        (StatusCode::BAD_REQUEST, "missing_field", Some(field.to_string()))
                    }
                    DomainError::WalletNotFound { .. } => {
                        (StatusCode::NOT_FOUND, "wallet_not_found", Some(domain_err.to_string()))
                    }
                    DomainError::RecipientNotFound(id) => {
                        (StatusCode::NOT_FOUND, "recipient_not_found", Some(id.clone()))
                    }
                    DomainError::InsufficientFunds { .. } => {
                        (StatusCode::BAD_REQUEST, "insufficient_funds", Some(domain_err.to_string()))
                    }
                    DomainError::SameCurrency => {
                        (StatusCode::BAD_REQUEST, "same_currency", None)
                    }
                    DomainError::DuplicateWallet(currency) => {
                        (StatusCode::CONFLICT, "duplicate_wallet", Some(currency.to_string()))
                    }
                    DomainError::InvalidDateRange => {
                        (StatusCode::BAD_REQUEST, "invalid_date_range", None)
                    }
                }
            }

            // Conversion failures: the rate source is an upstream dependency
            AppError::Fx(ref fx_err) => {
                use crate::fx::FxError;
                match fx_err {
                    FxError::RateUnavailable { .. } => {
                        (StatusCode::BAD_GATEWAY, "rate_unavailable", Some(fx_err.to_string()))
                    }
                    FxError::Api(msg) => {
                        tracing::error!("Rate source error: {}", msg);
                        (StatusCode::BAD_GATEWAY, "conversion_failed", None)
                    }
                    FxError::Request(e) => {
                        tracing::error!("Rate source request failed: {}", e);
                        (StatusCode::BAD_GATEWAY, "conversion_failed", None)
                    }
                    FxError::MissingConfig(_) => {
                        tracing::error!("Rate source misconfigured: {}", fx_err);
                        (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
                    }
                }
            }

            // Store invariants: the balance guard is a normal client error,
            // everything else is infrastructure
            AppError::WalletStore(ref store_err) => {
                use crate::wallet::WalletStoreError;
                match store_err {
                    WalletStoreError::InsufficientBalance { .. } => {
                        (StatusCode::BAD_REQUEST, "insufficient_funds", Some(store_err.to_string()))
                    }
                    WalletStoreError::NotFound(id) => {
                        (StatusCode::NOT_FOUND, "wallet_not_found", Some(id.to_string()))
                    }
                    WalletStoreError::Database(e) => {
                        tracing::error!("Wallet store database error: {:?}", e);
                        (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
                    }
                }
            }

            AppError::LedgerLog(ref log_err) => {
                tracing::error!("Transaction log error: {:?}", log_err);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
