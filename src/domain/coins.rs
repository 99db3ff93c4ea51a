//! Coins type
//!
//! Domain primitive for coin amounts with business rule validation.
//! Balances and prices are non-negative integers; arithmetic is checked so
//! an invalid balance cannot exist in the system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coins represents a validated, non-negative coin amount.
///
/// # Invariants
/// - Value is always >= 0
/// - Fits in a signed 64-bit database column
///
/// # Example
/// ```
/// use coin_store::domain::Coins;
///
/// let balance = Coins::new(1000);
/// let price = Coins::new(200);
/// assert_eq!(balance.checked_sub(price), Some(Coins::new(800)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Coins(u64);

/// Errors that can occur when creating or combining Coins
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoinsError {
    #[error("Coin amount must be non-negative (got {0})")]
    Negative(i64),

    #[error("Coin amount exceeds maximum representable value")]
    Overflow,
}

impl Coins {
    /// Zero coins.
    pub const ZERO: Coins = Coins(0);

    /// Create a Coins value from a non-negative count.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Convert a signed database column value, rejecting negatives.
    pub fn from_db(value: i64) -> Result<Self, CoinsError> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| CoinsError::Negative(value))
    }

    /// Get the raw coin count.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Signed representation for binding to a BIGINT column.
    pub fn as_db(&self) -> Result<i64, CoinsError> {
        i64::try_from(self.0).map_err(|_| CoinsError::Overflow)
    }

    /// Subtract, returning None on underflow.
    pub fn checked_sub(self, other: Coins) -> Option<Coins> {
        self.0.checked_sub(other.0).map(Coins)
    }

    /// Add, returning None on overflow.
    pub fn checked_add(self, other: Coins) -> Option<Coins> {
        self.0.checked_add(other.0).map(Coins)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Coins {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_sub_underflow() {
        let balance = Coins::new(100);
        let price = Coins::new(200);
        assert_eq!(balance.checked_sub(price), None);
    }

    #[test]
    fn test_checked_sub_exact() {
        let balance = Coins::new(200);
        assert_eq!(balance.checked_sub(Coins::new(200)), Some(Coins::ZERO));
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Coins::new(u64::MAX);
        assert_eq!(max.checked_add(Coins::new(1)), None);
    }

    #[test]
    fn test_from_db_rejects_negative() {
        assert_eq!(Coins::from_db(-1), Err(CoinsError::Negative(-1)));
        assert_eq!(Coins::from_db(0), Ok(Coins::ZERO));
        assert_eq!(Coins::from_db(800), Ok(Coins::new(800)));
    }

    #[test]
    fn test_db_round_trip() {
        let coins = Coins::new(12345);
        assert_eq!(Coins::from_db(coins.as_db().unwrap()).unwrap(), coins);
    }
}
