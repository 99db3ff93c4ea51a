//! Purchase usecase
//!
//! Single-account debit against a catalog price. Reads and the balance
//! check happen before any unit of work exists; the debit and the ledger
//! append share one atomic commit boundary.

use std::sync::Arc;

use crate::domain::{AccountId, DomainError, PurchaseRecord};
use crate::error::{AppError, AppResult};
use crate::repository::{AccountRepository, CatalogRepository, LedgerRepository, RepoError};
use crate::uow::UowFactory;

use super::rollback_after_failure;

/// Handler for catalog purchases
pub struct PurchaseUsecase {
    accounts: Arc<dyn AccountRepository>,
    catalog: Arc<dyn CatalogRepository>,
    ledger: Arc<dyn LedgerRepository>,
    uow_factory: Arc<dyn UowFactory>,
}

impl PurchaseUsecase {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        catalog: Arc<dyn CatalogRepository>,
        ledger: Arc<dyn LedgerRepository>,
        uow_factory: Arc<dyn UowFactory>,
    ) -> Self {
        Self {
            accounts,
            catalog,
            ledger,
            uow_factory,
        }
    }

    /// Debit the account by the item's price and append one purchase record,
    /// atomically.
    pub async fn purchase(
        &self,
        account_id: AccountId,
        item_name: &str,
    ) -> AppResult<PurchaseRecord> {
        let account = self
            .accounts
            .get_by_id(account_id)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => AppError::AccountNotFound(account_id.to_string()),
                other => other.into(),
            })?;

        let item = self
            .catalog
            .get_by_name(item_name)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => AppError::ItemNotFound(item_name.to_string()),
                other => other.into(),
            })?;

        // Checked subtraction doubles as the balance check: None exactly
        // when balance < price.
        let new_balance = account
            .balance
            .checked_sub(item.price)
            .ok_or_else(|| DomainError::insufficient_balance(item.price, account.balance))?;

        let mut uow = self.uow_factory.unit_of_work();
        uow.begin().await?;

        if let Err(err) = self
            .accounts
            .update_balance(uow.as_mut(), account.id, new_balance, account.balance)
            .await
        {
            rollback_after_failure(uow.as_mut(), "purchase balance update").await;
            return Err(err.into());
        }

        let record = match self
            .ledger
            .append_purchase(uow.as_mut(), account.id, &item)
            .await
        {
            Ok(record) => record,
            Err(err) => {
                rollback_after_failure(uow.as_mut(), "purchase ledger append").await;
                return Err(err.into());
            }
        };

        uow.commit().await?;

        tracing::info!(
            account_id = account.id,
            item = %item.name,
            price = %item.price,
            new_balance = %new_balance,
            "Purchase committed"
        );

        Ok(record)
    }
}
