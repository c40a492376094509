//! Concurrent handle over one ledger
//!
//! Every call holds the lock for the whole operation, transfers
//! included, so operations from different tasks never interleave.

use lendpool_core::{AccountId, Amount, PoolParams};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::LendingError;
use crate::ledger::Ledger;
use crate::liquidation::LiquidationResult;
use crate::query::{AccountSnapshot, PositionStatus, SupplyBalance};
use crate::state::{Account, Pool};

/// Cloneable, serialized access to a [`Ledger`]
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Exclusive access for multi-step work
    pub async fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.lock().await
    }

    /// Run a closure under the lock
    pub async fn with<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        let mut ledger = self.inner.lock().await;
        f(&mut ledger)
    }

    pub async fn supply(&self, account: &AccountId, amount: Amount) -> Result<(), LendingError> {
        self.inner.lock().await.supply(account, amount)
    }

    pub async fn withdraw_supply(&self, account: &AccountId, amount: Amount) -> Result<(), LendingError> {
        self.inner.lock().await.withdraw_supply(account, amount)
    }

    pub async fn claim_supply_interest(&self, account: &AccountId) -> Result<Amount, LendingError> {
        self.inner.lock().await.claim_supply_interest(account)
    }

    pub async fn deposit_collateral(&self, account: &AccountId, amount: Amount) -> Result<(), LendingError> {
        self.inner.lock().await.deposit_collateral(account, amount)
    }

    pub async fn withdraw_collateral(&self, account: &AccountId, amount: Amount) -> Result<(), LendingError> {
        self.inner.lock().await.withdraw_collateral(account, amount)
    }

    pub async fn borrow(&self, account: &AccountId, amount: Amount) -> Result<(), LendingError> {
        self.inner.lock().await.borrow(account, amount)
    }

    pub async fn repay(&self, account: &AccountId, amount: Amount) -> Result<Amount, LendingError> {
        self.inner.lock().await.repay(account, amount)
    }

    pub async fn liquidate(
        &self,
        liquidator: &AccountId,
        borrower: &AccountId,
        debt_to_cover: Amount,
    ) -> Result<LiquidationResult, LendingError> {
        self.inner
            .lock()
            .await
            .liquidate(liquidator, borrower, debt_to_cover)
    }

    pub async fn update_borrow_rate(&self, caller: &AccountId, rate: u128) -> Result<(), LendingError> {
        self.inner.lock().await.update_borrow_rate(caller, rate)
    }

    pub async fn update_supply_rate(&self, caller: &AccountId, rate: u128) -> Result<(), LendingError> {
        self.inner.lock().await.update_supply_rate(caller, rate)
    }

    pub async fn update_max_ltv(&self, caller: &AccountId, max_ltv_bps: u128) -> Result<(), LendingError> {
        self.inner.lock().await.update_max_ltv(caller, max_ltv_bps)
    }

    pub async fn update_liquidation_threshold(
        &self,
        caller: &AccountId,
        threshold_bps: u128,
    ) -> Result<(), LendingError> {
        self.inner
            .lock()
            .await
            .update_liquidation_threshold(caller, threshold_bps)
    }

    // === Queries ===

    pub async fn pool(&self) -> Pool {
        self.inner.lock().await.pool().clone()
    }

    pub async fn params(&self) -> PoolParams {
        *self.inner.lock().await.params()
    }

    pub async fn account(&self, id: &AccountId) -> Option<Account> {
        self.inner.lock().await.account(id).cloned()
    }

    pub async fn accounts(&self) -> Vec<(AccountId, Account)> {
        self.inner
            .lock()
            .await
            .accounts()
            .map(|(id, account)| (id.clone(), account.clone()))
            .collect()
    }

    pub async fn current_debt(&self, id: &AccountId) -> Result<Amount, LendingError> {
        self.inner.lock().await.current_debt(id)
    }

    pub async fn supply_balance(&self, id: &AccountId) -> Result<SupplyBalance, LendingError> {
        self.inner.lock().await.supply_balance(id)
    }

    pub async fn collateral_value(&self, id: &AccountId) -> Result<Amount, LendingError> {
        self.inner.lock().await.collateral_value(id)
    }

    pub async fn health_factor(&self, id: &AccountId) -> Result<u128, LendingError> {
        self.inner.lock().await.health_factor(id)
    }

    pub async fn max_borrowable(&self, id: &AccountId) -> Result<Amount, LendingError> {
        self.inner.lock().await.max_borrowable(id)
    }

    pub async fn can_liquidate(&self, id: &AccountId) -> Result<bool, LendingError> {
        self.inner.lock().await.can_liquidate(id)
    }

    pub async fn position_status(&self, id: &AccountId) -> Result<PositionStatus, LendingError> {
        self.inner.lock().await.position_status(id)
    }

    pub async fn account_snapshot(&self, id: &AccountId) -> Result<AccountSnapshot, LendingError> {
        self.inner.lock().await.account_snapshot(id)
    }

    pub async fn utilization_bps(&self) -> Result<u128, LendingError> {
        self.inner.lock().await.utilization_bps()
    }

    pub async fn liquidatable_accounts(&self) -> Result<Vec<AccountId>, LendingError> {
        self.inner.lock().await.liquidatable_accounts()
    }
}
