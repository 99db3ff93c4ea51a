//! Domain module
//!
//! Core domain types and business rules.

pub mod coins;
pub mod error;
pub mod models;

pub use coins::{Coins, CoinsError};
pub use error::DomainError;
pub use models::{Account, AccountId, CatalogItem, PurchaseRecord, TransferRecord};
