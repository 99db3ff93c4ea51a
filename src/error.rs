//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::repository::RepoError;
use crate::uow::UowError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Catalog item not found: {0}")]
    ItemNotFound(String),

    #[error("Wrong username or password")]
    WrongCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    // Operation deadline exceeded
    #[error("Operation timed out")]
    Timeout,

    // Store errors
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Uow(#[from] UowError),

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

            // 401 Unauthorized
            AppError::WrongCredentials => {
                (StatusCode::UNAUTHORIZED, "wrong_credentials", None)
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),

            // 404 Not Found
            AppError::AccountNotFound(id) => {
                (StatusCode::NOT_FOUND, "account_not_found", Some(id.clone()))
            }
            AppError::ItemNotFound(name) => {
                (StatusCode::NOT_FOUND, "item_not_found", Some(name.clone()))
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => {
                use crate::domain::DomainError;
                match domain_err {
                    DomainError::InsufficientBalance { .. } => (
                        StatusCode::BAD_REQUEST,
                        "insufficient_balance",
                        Some(domain_err.to_string()),
                    ),
                    DomainError::SelfTransfer => {
                        (StatusCode::BAD_REQUEST, "self_transfer", None)
                    }
                    DomainError::InvalidAmount(msg) => {
                        (StatusCode::BAD_REQUEST, "invalid_amount", Some(msg.clone()))
                    }
                    DomainError::BalanceOverflow => {
                        (StatusCode::BAD_REQUEST, "balance_overflow", None)
                    }
                }
            }

            // 504 Gateway Timeout
            AppError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "operation_timeout", None),

            // Store errors
            AppError::Repo(repo_err) => match repo_err {
                RepoError::NotFound => (StatusCode::NOT_FOUND, "not_found", None),
                RepoError::AlreadyExists => (StatusCode::CONFLICT, "already_exists", None),
                RepoError::BalanceConflict => {
                    (StatusCode::CONFLICT, "balance_conflict", None)
                }
                RepoError::CorruptBalance(e) => {
                    tracing::error!("Corrupt balance column: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
                }
                RepoError::Uow(e) => {
                    tracing::error!("Transaction error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "transaction_error",
                        None,
                    )
                }
                RepoError::Database(e) => {
                    tracing::error!("Database error: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
                }
            },
            AppError::Uow(e) => {
                tracing::error!("Transaction error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "transaction_error",
                    None,
                )
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
