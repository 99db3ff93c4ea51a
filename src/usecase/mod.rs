//! Usecases module
//!
//! The transfer engine: business operations orchestrating reads, balance
//! checks, and transactional writes through a unit of work. Usecases are
//! stateless between calls; each operation mints its own unit of work and
//! discards it.

mod purchase;
mod report;
mod session;
mod transfer;


pub use purchase::PurchaseUsecase;
pub use report::{AccountInfo, ReportUsecase};
pub use session::{hash_token, IssuedSession, SessionUsecase};
pub use transfer::TransferUsecase;

use crate::uow::UnitOfWork;

/// Roll back after a failed write. A rollback failure is logged but never
/// replaces the original error returned to the caller.
pub(crate) async fn rollback_after_failure(uow: &mut dyn UnitOfWork, operation: &str) {
    if let Err(rollback_err) = uow.rollback().await {
        tracing::error!(
            operation,
            error = %rollback_err,
            "Rollback failed while unwinding a failed write"
        );
    }
}
