//! Postgres repositories
//!
//! One concrete implementation per store capability. Reads go straight to
//! the shared pool; balance and ledger writes execute only through the unit
//! of work handed in by the transfer engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Account, AccountId, CatalogItem, Coins, PurchaseRecord, TransferRecord};
use crate::uow::{SqlParam, UnitOfWork};

use super::{
    AccountRepository, CatalogRepository, InventoryEntry, LedgerRepository, ReceivedEntry,
    RepoError, SentEntry, SessionRepository,
};

fn row_to_account(row: (i64, String, i64, String)) -> Result<Account, RepoError> {
    let (id, username, balance, password_hash) = row;
    Ok(Account {
        id,
        username,
        balance: Coins::from_db(balance)?,
        password_hash,
    })
}

/// Account store backed by the `accounts` table.
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn get_by_id(&self, id: AccountId) -> Result<Account, RepoError> {
        let row: Option<(i64, String, i64, String)> = sqlx::query_as(
            "SELECT id, username, balance, password_hash FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row_to_account(row.ok_or(RepoError::NotFound)?)
    }

    async fn get_by_username(&self, username: &str) -> Result<Account, RepoError> {
        let row: Option<(i64, String, i64, String)> = sqlx::query_as(
            "SELECT id, username, balance, password_hash FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row_to_account(row.ok_or(RepoError::NotFound)?)
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        initial_balance: Coins,
    ) -> Result<Account, RepoError> {
        let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_some() {
            return Err(RepoError::AlreadyExists);
        }

        let row: (i64, String, i64, String) = sqlx::query_as(
            r#"
            INSERT INTO accounts (username, balance, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, balance, password_hash
            "#,
        )
        .bind(username)
        .bind(initial_balance.as_db()?)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        row_to_account(row)
    }

    async fn update_balance(
        &self,
        uow: &mut dyn UnitOfWork,
        id: AccountId,
        new_balance: Coins,
        expected: Coins,
    ) -> Result<(), RepoError> {
        // Optimistic compare-and-swap: a concurrent commit since our read
        // makes the predicate miss instead of silently overwriting.
        let rows = uow
            .execute(
                "UPDATE accounts SET balance = $1 WHERE id = $2 AND balance = $3",
                &[
                    SqlParam::BigInt(new_balance.as_db()?),
                    SqlParam::BigInt(id),
                    SqlParam::BigInt(expected.as_db()?),
                ],
            )
            .await?;

        if rows == 0 {
            return Err(RepoError::BalanceConflict);
        }

        Ok(())
    }
}

/// Catalog store backed by the `catalog_items` table.
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn get_by_name(&self, name: &str) -> Result<CatalogItem, RepoError> {
        let row: Option<(i64, String, i64)> =
            sqlx::query_as("SELECT id, name, price FROM catalog_items WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        let (id, name, price) = row.ok_or(RepoError::NotFound)?;
        Ok(CatalogItem {
            id,
            name,
            price: Coins::from_db(price)?,
        })
    }
}

/// Ledger store backed by the `purchases` and `transfers` tables.
#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    async fn append_purchase(
        &self,
        uow: &mut dyn UnitOfWork,
        purchaser_id: AccountId,
        item: &CatalogItem,
    ) -> Result<PurchaseRecord, RepoError> {
        let created_at = Utc::now();

        let id = uow
            .fetch_id(
                r#"
                INSERT INTO purchases (purchaser_id, item_id, created_at)
                VALUES ($1, $2, $3)
                RETURNING id
                "#,
                &[
                    SqlParam::BigInt(purchaser_id),
                    SqlParam::BigInt(item.id),
                    SqlParam::Timestamp(created_at),
                ],
            )
            .await?;

        Ok(PurchaseRecord {
            id,
            purchaser_id,
            item_name: item.name.clone(),
            created_at,
        })
    }

    async fn append_transfer(
        &self,
        uow: &mut dyn UnitOfWork,
        sender_id: AccountId,
        receiver_id: AccountId,
        amount: Coins,
    ) -> Result<TransferRecord, RepoError> {
        let created_at = Utc::now();

        let id = uow
            .fetch_id(
                r#"
                INSERT INTO transfers (sender_id, receiver_id, amount, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
                &[
                    SqlParam::BigInt(sender_id),
                    SqlParam::BigInt(receiver_id),
                    SqlParam::BigInt(amount.as_db()?),
                    SqlParam::Timestamp(created_at),
                ],
            )
            .await?;

        Ok(TransferRecord {
            id,
            sender_id,
            receiver_id,
            amount,
            created_at,
        })
    }

    async fn inventory_by_account(&self, id: AccountId) -> Result<Vec<InventoryEntry>, RepoError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT ci.name, COUNT(p.id)
            FROM purchases p
            JOIN catalog_items ci ON p.item_id = ci.id
            WHERE p.purchaser_id = $1
            GROUP BY ci.name
            ORDER BY ci.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(item_name, quantity)| InventoryEntry {
                item_name,
                quantity,
            })
            .collect())
    }

    async fn received_by_account(&self, id: AccountId) -> Result<Vec<ReceivedEntry>, RepoError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT a.username, SUM(t.amount)::BIGINT
            FROM transfers t
            JOIN accounts a ON t.sender_id = a.id
            WHERE t.receiver_id = $1
            GROUP BY a.username
            ORDER BY a.username
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(from_username, amount)| {
                Ok(ReceivedEntry {
                    from_username,
                    amount: Coins::from_db(amount)?,
                })
            })
            .collect()
    }

    async fn sent_by_account(&self, id: AccountId) -> Result<Vec<SentEntry>, RepoError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT a.username, SUM(t.amount)::BIGINT
            FROM transfers t
            JOIN accounts a ON t.receiver_id = a.id
            WHERE t.sender_id = $1
            GROUP BY a.username
            ORDER BY a.username
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(to_username, amount)| {
                Ok(SentEntry {
                    to_username,
                    amount: Coins::from_db(amount)?,
                })
            })
            .collect()
    }
}

/// Session store backed by the `sessions` table.
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(
        &self,
        account_id: AccountId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO sessions (account_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(account_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_account_by_token_hash(&self, token_hash: &str) -> Result<Account, RepoError> {
        let row: Option<(i64, String, i64, String)> = sqlx::query_as(
            r#"
            SELECT a.id, a.username, a.balance, a.password_hash
            FROM sessions s
            JOIN accounts a ON s.account_id = a.id
            WHERE s.token_hash = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        row_to_account(row.ok_or(RepoError::NotFound)?)
    }
}
