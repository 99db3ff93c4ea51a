//! Unit of Work
//!
//! A scoped transactional execution context binding all store writes of one
//! business operation into a single atomic commit/rollback boundary. The
//! transfer engine depends only on the [`UnitOfWork`] and [`UowFactory`]
//! traits, so usecases stay independent of the storage technology and can be
//! tested against an in-memory fake that records calls.

pub mod postgres;

pub use postgres::{PgUnitOfWork, PgUowFactory};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Statement parameter for writes executed through a unit of work.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    BigInt(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Transaction lifecycle and scoped-write failures.
///
/// Lifecycle errors are always terminal for the operation and surfaced to
/// the caller verbatim; the core never retries them.
#[derive(Debug, Error)]
pub enum UowError {
    /// Begin called on an already-active unit of work
    #[error("Transaction already started")]
    AlreadyStarted,

    /// Write or commit/rollback attempted before begin or after termination
    #[error("Transaction not started")]
    NotStarted,

    /// The store could not open a transaction
    #[error("Failed to begin transaction: {0}")]
    Begin(#[source] sqlx::Error),

    /// A write inside the active transaction failed
    #[error("Transaction write failed: {0}")]
    Write(#[source] sqlx::Error),

    /// Commit failed; the store's commit failure semantics decide the outcome
    #[error("Failed to commit transaction: {0}")]
    Commit(#[source] sqlx::Error),

    /// Rollback reported a failure (never masks the original write error)
    #[error("Failed to roll back transaction: {0}")]
    Rollback(#[source] sqlx::Error),
}

/// One atomic commit/rollback boundary.
///
/// States: not-started -> active (after [`begin`](UnitOfWork::begin)) ->
/// terminal (after commit or rollback). Operating on a terminal unit of work
/// fails with [`UowError::NotStarted`]; double-begin fails with
/// [`UowError::AlreadyStarted`]. One instance serves exactly one business
/// operation and is discarded afterwards.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Open the underlying transaction.
    async fn begin(&mut self) -> Result<(), UowError>;

    /// Execute a write statement inside the active transaction, returning
    /// the number of affected rows.
    async fn execute(&mut self, statement: &str, params: &[SqlParam]) -> Result<u64, UowError>;

    /// Execute an `INSERT ... RETURNING id` statement inside the active
    /// transaction.
    async fn fetch_id(&mut self, statement: &str, params: &[SqlParam]) -> Result<i64, UowError>;

    /// Durably apply all writes made through this unit of work. Terminal
    /// regardless of outcome.
    async fn commit(&mut self) -> Result<(), UowError>;

    /// Discard all writes made through this unit of work. Terminal
    /// regardless of outcome; safe to call on an already-aborted
    /// transaction (reports [`UowError::NotStarted`], never panics).
    async fn rollback(&mut self) -> Result<(), UowError>;
}

/// Mints a fresh unit of work per business operation.
///
/// The transfer engine never retains a unit of work between operations.
pub trait UowFactory: Send + Sync {
    fn unit_of_work(&self) -> Box<dyn UnitOfWork>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_param_conversions() {
        assert_eq!(SqlParam::from(42i64), SqlParam::BigInt(42));
        assert_eq!(
            SqlParam::from("powerbank"),
            SqlParam::Text("powerbank".to_string())
        );
    }

    #[test]
    fn test_lifecycle_errors_are_distinct() {
        assert_eq!(
            UowError::AlreadyStarted.to_string(),
            "Transaction already started"
        );
        assert_eq!(UowError::NotStarted.to_string(), "Transaction not started");
    }
}
