//! Persistent ledger records

use lendpool_core::{Amount, PoolParams};
use lendpool_risk::{BorrowPosition, SupplyPosition};
use serde::{Deserialize, Serialize};

/// Pool singleton: running totals plus current parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Sum of every account's supplied principal
    pub total_supplied: Amount,
    /// Sum of every account's debt (interest included)
    pub total_borrowed: Amount,
    /// Sum of every account's collateral
    pub total_collateral: Amount,
    pub params: PoolParams,
}

impl Pool {
    pub fn new(params: PoolParams) -> Self {
        Self {
            total_supplied: Amount::ZERO,
            total_borrowed: Amount::ZERO,
            total_collateral: Amount::ZERO,
            params,
        }
    }
}

/// Per-participant record. Created on first supply or collateral deposit
/// and kept forever, even when every balance returns to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub supply: SupplyPosition,
    pub collateral: Amount,
    pub borrow: BorrowPosition,
}

impl Account {
    pub fn is_empty(&self) -> bool {
        self.supply.is_empty() && self.collateral.is_zero() && !self.borrow.has_debt()
    }
}
