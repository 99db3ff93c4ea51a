//! Postgres Unit of Work
//!
//! Wraps one `sqlx::Transaction` behind the [`UnitOfWork`] contract. The
//! transaction handle is taken out of the slot on commit/rollback, so the
//! unit of work is terminal afterwards regardless of the store's outcome.
//! An active handle that is dropped without commit (panic, cancelled
//! deadline) is rolled back by sqlx's `Transaction` drop behavior, so no
//! exit path can orphan an open transaction.

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::{Query, QueryScalar};
use sqlx::{PgPool, Postgres, Transaction};

use super::{SqlParam, UnitOfWork, UowError, UowFactory};

/// Unit of work over a Postgres transaction.
pub struct PgUnitOfWork {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, tx: None }
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[SqlParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::BigInt(value) => query.bind(*value),
            SqlParam::Text(value) => query.bind(value.clone()),
            SqlParam::Timestamp(value) => query.bind(*value),
        };
    }
    query
}

fn bind_scalar_params<'q>(
    mut query: QueryScalar<'q, Postgres, i64, PgArguments>,
    params: &[SqlParam],
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::BigInt(value) => query.bind(*value),
            SqlParam::Text(value) => query.bind(value.clone()),
            SqlParam::Timestamp(value) => query.bind(*value),
        };
    }
    query
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn begin(&mut self) -> Result<(), UowError> {
        if self.tx.is_some() {
            return Err(UowError::AlreadyStarted);
        }

        let tx = self.pool.begin().await.map_err(UowError::Begin)?;
        self.tx = Some(tx);
        Ok(())
    }

    async fn execute(&mut self, statement: &str, params: &[SqlParam]) -> Result<u64, UowError> {
        let tx = self.tx.as_mut().ok_or(UowError::NotStarted)?;

        let result = bind_params(sqlx::query(statement), params)
            .execute(&mut **tx)
            .await
            .map_err(UowError::Write)?;

        Ok(result.rows_affected())
    }

    async fn fetch_id(&mut self, statement: &str, params: &[SqlParam]) -> Result<i64, UowError> {
        let tx = self.tx.as_mut().ok_or(UowError::NotStarted)?;

        bind_scalar_params(sqlx::query_scalar::<_, i64>(statement), params)
            .fetch_one(&mut **tx)
            .await
            .map_err(UowError::Write)
    }

    async fn commit(&mut self) -> Result<(), UowError> {
        let tx = self.tx.take().ok_or(UowError::NotStarted)?;
        tx.commit().await.map_err(UowError::Commit)
    }

    async fn rollback(&mut self) -> Result<(), UowError> {
        let tx = self.tx.take().ok_or(UowError::NotStarted)?;
        tx.rollback().await.map_err(UowError::Rollback)
    }
}

/// Factory producing one [`PgUnitOfWork`] per business operation.
#[derive(Clone)]
pub struct PgUowFactory {
    pool: PgPool,
}

impl PgUowFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UowFactory for PgUowFactory {
    fn unit_of_work(&self) -> Box<dyn UnitOfWork> {
        Box::new(PgUnitOfWork::new(self.pool.clone()))
    }
}
