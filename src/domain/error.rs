//! Domain Error Types
//!
//! Pure business rule violations, independent of the web and storage layers.

use thiserror::Error;

use super::Coins;

/// Business rule violations detected before any unit of work is opened.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Insufficient balance for a debit operation
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Coins, available: Coins },

    /// Transfer where sender and receiver are the same account
    #[error("Cannot transfer coins to the same account")]
    SelfTransfer,

    /// Zero or otherwise unusable amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Balance arithmetic would overflow the representable range
    #[error("Balance arithmetic overflow")]
    BalanceOverflow,
}

impl DomainError {
    /// Create an insufficient balance error
    pub fn insufficient_balance(required: Coins, available: Coins) -> Self {
        Self::InsufficientBalance {
            required,
            available,
        }
    }

    /// Check if this is a client error (user's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. } | Self::SelfTransfer | Self::InvalidAmount(_)
        )
    }
}
