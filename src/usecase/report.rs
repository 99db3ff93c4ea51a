//! Report usecase
//!
//! Aggregated per-account view: current balance, purchased inventory, and
//! coin history grouped by counterparty. Read-only; never opens a unit of
//! work.

use std::sync::Arc;

use crate::domain::{AccountId, Coins};
use crate::error::{AppError, AppResult};
use crate::repository::{
    AccountRepository, InventoryEntry, LedgerRepository, ReceivedEntry, RepoError, SentEntry,
};

/// Aggregated account report
#[derive(Debug, Clone)]
pub struct AccountInfo {
    pub coins: Coins,
    pub inventory: Vec<InventoryEntry>,
    pub received: Vec<ReceivedEntry>,
    pub sent: Vec<SentEntry>,
}

pub struct ReportUsecase {
    accounts: Arc<dyn AccountRepository>,
    ledger: Arc<dyn LedgerRepository>,
}

impl ReportUsecase {
    pub fn new(accounts: Arc<dyn AccountRepository>, ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { accounts, ledger }
    }

    pub async fn info(&self, account_id: AccountId) -> AppResult<AccountInfo> {
        let account = self
            .accounts
            .get_by_id(account_id)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => AppError::AccountNotFound(account_id.to_string()),
                other => other.into(),
            })?;

        let inventory = self.ledger.inventory_by_account(account_id).await?;
        let sent = self.ledger.sent_by_account(account_id).await?;
        let received = self.ledger.received_by_account(account_id).await?;

        Ok(AccountInfo {
            coins: account.balance,
            inventory,
            received,
            sent,
        })
    }
}
