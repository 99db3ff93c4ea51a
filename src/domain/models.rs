//! Domain models
//!
//! Account balances, catalog reference data, and ledger records.
//! Accounts are mutated only through a committed unit of work; catalog items
//! are immutable reference data; ledger records are append-only.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Coins;

/// Account identifier (BIGSERIAL primary key)
pub type AccountId = i64;

/// A user's coin balance record.
///
/// Created once at signup with the configured initial grant; never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub balance: Coins,
    pub password_hash: String,
}

/// Purchasable item type with its fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub price: Coins,
}

/// One row per successful purchase, appended inside the purchase UoW.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseRecord {
    pub id: i64,
    pub purchaser_id: AccountId,
    pub item_name: String,
    pub created_at: DateTime<Utc>,
}

/// One row per successful peer transfer, appended inside the transfer UoW.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    pub id: i64,
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub amount: Coins,
    pub created_at: DateTime<Utc>,
}
