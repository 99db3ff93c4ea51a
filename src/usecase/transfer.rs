//! Peer transfer usecase
//!
//! Two-account debit plus credit with a strict conservation invariant: for
//! every committed transfer the sender's delta and the receiver's delta sum
//! to zero. Debit, credit, and the ledger append share one atomic commit
//! boundary, in that fixed order.

use std::sync::Arc;

use crate::domain::{Coins, DomainError, TransferRecord};
use crate::error::{AppError, AppResult};
use crate::repository::{AccountRepository, LedgerRepository, RepoError};
use crate::uow::UowFactory;

use super::rollback_after_failure;

/// Handler for peer-to-peer coin transfers
pub struct TransferUsecase {
    accounts: Arc<dyn AccountRepository>,
    ledger: Arc<dyn LedgerRepository>,
    uow_factory: Arc<dyn UowFactory>,
}

impl TransferUsecase {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        ledger: Arc<dyn LedgerRepository>,
        uow_factory: Arc<dyn UowFactory>,
    ) -> Self {
        Self {
            accounts,
            ledger,
            uow_factory,
        }
    }

    /// Move `amount` coins from sender to receiver and append one transfer
    /// record, atomically.
    pub async fn transfer(
        &self,
        sender_username: &str,
        receiver_username: &str,
        amount: Coins,
    ) -> AppResult<TransferRecord> {
        if amount.is_zero() {
            return Err(
                DomainError::InvalidAmount("transfer amount must be positive".to_string()).into(),
            );
        }

        // Self-transfer is rejected before any read or write; a debit and
        // credit against one account from the same stale read would not
        // converge to a net-zero balance change.
        if sender_username == receiver_username {
            return Err(DomainError::SelfTransfer.into());
        }

        let sender = self
            .accounts
            .get_by_username(sender_username)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => AppError::AccountNotFound(sender_username.to_string()),
                other => other.into(),
            })?;

        let receiver = self
            .accounts
            .get_by_username(receiver_username)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => AppError::AccountNotFound(receiver_username.to_string()),
                other => other.into(),
            })?;

        // Usernames are unique, but the id check costs nothing.
        if sender.id == receiver.id {
            return Err(DomainError::SelfTransfer.into());
        }

        let new_sender_balance = sender
            .balance
            .checked_sub(amount)
            .ok_or_else(|| DomainError::insufficient_balance(amount, sender.balance))?;

        let new_receiver_balance = receiver
            .balance
            .checked_add(amount)
            .ok_or(DomainError::BalanceOverflow)?;

        let mut uow = self.uow_factory.unit_of_work();
        uow.begin().await?;

        if let Err(err) = self
            .accounts
            .update_balance(uow.as_mut(), sender.id, new_sender_balance, sender.balance)
            .await
        {
            rollback_after_failure(uow.as_mut(), "transfer sender debit").await;
            return Err(err.into());
        }

        if let Err(err) = self
            .accounts
            .update_balance(
                uow.as_mut(),
                receiver.id,
                new_receiver_balance,
                receiver.balance,
            )
            .await
        {
            rollback_after_failure(uow.as_mut(), "transfer receiver credit").await;
            return Err(err.into());
        }

        let record = match self
            .ledger
            .append_transfer(uow.as_mut(), sender.id, receiver.id, amount)
            .await
        {
            Ok(record) => record,
            Err(err) => {
                rollback_after_failure(uow.as_mut(), "transfer ledger append").await;
                return Err(err.into());
            }
        };

        uow.commit().await?;

        tracing::info!(
            sender = %sender.username,
            receiver = %receiver.username,
            amount = %amount,
            "Transfer committed"
        );

        Ok(record)
    }
}
