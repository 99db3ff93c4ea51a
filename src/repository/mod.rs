//! Repository contracts
//!
//! Capability traits per store, consumed by the transfer engine. Each store
//! has one Postgres implementation; tests substitute in-memory fakes. Reads
//! run directly against the shared pool; every mutation of account balances
//! and ledger rows executes through the unit of work passed in by the
//! caller, never through a transaction the repository opens itself.

pub mod postgres;

pub use postgres::{
    PgAccountRepository, PgCatalogRepository, PgLedgerRepository, PgSessionRepository,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    Account, AccountId, CatalogItem, Coins, CoinsError, PurchaseRecord, TransferRecord,
};
use crate::uow::{UnitOfWork, UowError};

/// Store access failures. Not-found is distinguished from infrastructure
/// errors so usecases can map it to a domain outcome.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The requested row does not exist
    #[error("Record not found")]
    NotFound,

    /// A uniqueness constraint rejected the insert
    #[error("Record already exists")]
    AlreadyExists,

    /// Conditional balance write matched zero rows: the balance changed
    /// between the read and the write
    #[error("Balance changed concurrently")]
    BalanceConflict,

    /// Stored balance column holds a value outside the domain range
    #[error("Stored balance out of range: {0}")]
    CorruptBalance(#[from] CoinsError),

    /// Failure inside the unit of work
    #[error(transparent)]
    Uow(#[from] UowError),

    /// Infrastructure failure outside any unit of work
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Account balance store: point reads plus a conditional, transaction-scoped
/// balance write.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get_by_id(&self, id: AccountId) -> Result<Account, RepoError>;

    async fn get_by_username(&self, username: &str) -> Result<Account, RepoError>;

    /// Create an account at signup with the initial coin grant.
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        initial_balance: Coins,
    ) -> Result<Account, RepoError>;

    /// Write `new_balance` for the account through the given unit of work,
    /// conditional on the stored balance still being `expected`. A stale
    /// `expected` yields [`RepoError::BalanceConflict`].
    async fn update_balance(
        &self,
        uow: &mut dyn UnitOfWork,
        id: AccountId,
        new_balance: Coins,
        expected: Coins,
    ) -> Result<(), RepoError>;
}

/// Read-only lookup of purchasable item type to price.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn get_by_name(&self, name: &str) -> Result<CatalogItem, RepoError>;
}

/// Per-item quantity owned by an account, aggregated server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub item_name: String,
    pub quantity: i64,
}

/// Total coins received from one counterparty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedEntry {
    pub from_username: String,
    pub amount: Coins,
}

/// Total coins sent to one counterparty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEntry {
    pub to_username: String,
    pub amount: Coins,
}

/// Append-only log of completed purchases and transfers, plus the aggregate
/// history reads used by the reporting usecase.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Append one purchase row through the given unit of work.
    async fn append_purchase(
        &self,
        uow: &mut dyn UnitOfWork,
        purchaser_id: AccountId,
        item: &CatalogItem,
    ) -> Result<PurchaseRecord, RepoError>;

    /// Append one transfer row through the given unit of work.
    async fn append_transfer(
        &self,
        uow: &mut dyn UnitOfWork,
        sender_id: AccountId,
        receiver_id: AccountId,
        amount: Coins,
    ) -> Result<TransferRecord, RepoError>;

    async fn inventory_by_account(&self, id: AccountId) -> Result<Vec<InventoryEntry>, RepoError>;

    async fn received_by_account(&self, id: AccountId) -> Result<Vec<ReceivedEntry>, RepoError>;

    async fn sent_by_account(&self, id: AccountId) -> Result<Vec<SentEntry>, RepoError>;
}

/// Opaque bearer session store.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(
        &self,
        account_id: AccountId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepoError>;

    /// Resolve an unexpired session token hash to its account.
    async fn get_account_by_token_hash(&self, token_hash: &str) -> Result<Account, RepoError>;
}
