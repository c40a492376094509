//! Interest-bearing positions held by an account

use lendpool_core::{math, Amount, MathError};
use serde::{Deserialize, Serialize};

/// Supplied principal plus interest that has been credited but not paid.
///
/// Interest is kept apart from principal so withdrawals can draw on it
/// first. `last_accrual == 0` means accrual has not started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyPosition {
    pub principal: Amount,
    pub accrued_interest: Amount,
    pub last_accrual: u64,
}

impl SupplyPosition {
    /// Principal plus credited interest
    pub fn entitlement(&self) -> Result<Amount, MathError> {
        math::add(self.principal, self.accrued_interest)
    }

    pub fn is_empty(&self) -> bool {
        self.principal.is_zero() && self.accrued_interest.is_zero()
    }
}

/// Outstanding debt. Accrued interest is folded into `principal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowPosition {
    pub principal: Amount,
    pub last_accrual: u64,
}

impl BorrowPosition {
    pub fn has_debt(&self) -> bool {
        !self.principal.is_zero()
    }
}
