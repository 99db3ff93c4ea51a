//! coin-store Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repository;
pub mod uow;
pub mod usecase;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{Account, CatalogItem, Coins, DomainError, PurchaseRecord, TransferRecord};
pub use uow::{UnitOfWork, UowError, UowFactory};
