//! The lending ledger
//!
//! Every mutating operation follows the same shape:
//!
//! 1. accrue interest on the touched positions
//! 2. validate preconditions
//! 3. commit pool and account state
//! 4. move tokens through the custody adapters
//! 5. publish buffered events
//!
//! A failure at any step restores the checkpoint taken before step 1, so
//! the operation leaves no trace. State is committed before tokens move;
//! `&mut self` rules out re-entry while a transfer is in flight.

use lendpool_core::math::{self, MIN_HEALTH_FACTOR};
use lendpool_core::{AccountId, Amount, Clock, ParamsError, PoolParams};
use lendpool_custody::{AssetTransfer, TransferError};
use lendpool_oracle::PriceOracle;
use lendpool_risk::{Accrual, InterestAccrualEngine, RiskEngine};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::PoolConfig;
use crate::error::LendingError;
use crate::event::{EventSink, LendingEvent};
use crate::liquidation::LiquidationEngine;
use crate::state::{Account, Pool};

/// External collaborators injected into the ledger
#[derive(Clone)]
pub struct LedgerDeps {
    pub oracle: Arc<dyn PriceOracle>,
    /// Custody of the supplied and borrowed asset
    pub asset_token: Arc<dyn AssetTransfer>,
    /// Custody of the collateral asset
    pub collateral_token: Arc<dyn AssetTransfer>,
    pub clock: Arc<dyn Clock>,
}

/// Pre-operation copy of everything an operation may touch
pub(crate) struct Checkpoint {
    pool: Pool,
    accounts: Vec<(AccountId, Option<Account>)>,
}

/// Single-collateral lending pool
pub struct Ledger {
    pub(crate) admin: AccountId,
    pub(crate) pool: Pool,
    pub(crate) accounts: BTreeMap<AccountId, Account>,
    pub(crate) risk: RiskEngine,
    pub(crate) interest: InterestAccrualEngine,
    pub(crate) liquidation: LiquidationEngine,
    pub(crate) asset_token: Arc<dyn AssetTransfer>,
    pub(crate) collateral_token: Arc<dyn AssetTransfer>,
    pub(crate) clock: Arc<dyn Clock>,
    sinks: Vec<Arc<dyn EventSink>>,
    pending: Vec<LendingEvent>,
}

impl Ledger {
    /// Build a pool from validated configuration
    pub fn new(config: &PoolConfig, deps: LedgerDeps) -> Result<Self, LendingError> {
        let params = config.params()?;

        if deps.asset_token.asset() != &config.borrow_asset {
            return Err(ParamsError::AssetMismatch {
                role: "borrow",
                expected: config.borrow_asset.to_string(),
                actual: deps.asset_token.asset().to_string(),
            }
            .into());
        }
        if deps.collateral_token.asset() != &config.collateral_asset {
            return Err(ParamsError::AssetMismatch {
                role: "collateral",
                expected: config.collateral_asset.to_string(),
                actual: deps.collateral_token.asset().to_string(),
            }
            .into());
        }

        tracing::info!(
            borrow_asset = %config.borrow_asset,
            collateral_asset = %config.collateral_asset,
            max_ltv_bps = params.max_ltv_bps,
            liquidation_threshold_bps = params.liquidation_threshold_bps,
            "Lending pool created"
        );

        Ok(Self {
            admin: config.admin.clone(),
            pool: Pool::new(params),
            accounts: BTreeMap::new(),
            risk: RiskEngine::new(deps.oracle, config.collateral_asset.clone()),
            interest: InterestAccrualEngine::new(),
            liquidation: LiquidationEngine::new(),
            asset_token: deps.asset_token,
            collateral_token: deps.collateral_token,
            clock: deps.clock,
            sinks: Vec::new(),
            pending: Vec::new(),
        })
    }

    /// Attach an event sink
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn add_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Current ledger time
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    // === Supply side ===

    /// Deposit the borrow asset to earn supply interest
    pub fn supply(&mut self, account: &AccountId, amount: Amount) -> Result<(), LendingError> {
        let now = self.clock.now();
        let checkpoint = self.checkpoint(&[account]);
        let result = self.apply_supply(account, amount, now);
        self.finish("supply", checkpoint, now, result)
    }

    fn apply_supply(&mut self, id: &AccountId, amount: Amount, now: u64) -> Result<(), LendingError> {
        ensure_positive(amount)?;
        let mut account = self.load(id);
        self.accrue_supply(id, &mut account, now)?;

        account.supply.principal = math::add(account.supply.principal, amount)?;
        account.supply.last_accrual = now;
        self.pool.total_supplied = math::add(self.pool.total_supplied, amount)?;
        self.accounts.insert(id.clone(), account);
        self.emit(LendingEvent::Supplied {
            account: id.clone(),
            amount,
        });

        self.asset_token
            .transfer_in(id, amount)
            .map_err(|e| transfer_failed("supply", e))?;

        tracing::info!(account = %id, amount = %amount, "Supplied");
        Ok(())
    }

    /// Withdraw supplied funds, credited interest first
    pub fn withdraw_supply(&mut self, account: &AccountId, amount: Amount) -> Result<(), LendingError> {
        let now = self.clock.now();
        let checkpoint = self.checkpoint(&[account]);
        let result = self.apply_withdraw_supply(account, amount, now);
        self.finish("withdraw_supply", checkpoint, now, result)
    }

    fn apply_withdraw_supply(
        &mut self,
        id: &AccountId,
        amount: Amount,
        now: u64,
    ) -> Result<(), LendingError> {
        ensure_positive(amount)?;
        let mut account = self.load(id);
        self.accrue_supply(id, &mut account, now)?;

        let entitlement = account.supply.entitlement()?;
        if amount > entitlement {
            return Err(LendingError::InsufficientSupply {
                account: id.to_string(),
                available: entitlement,
                requested: amount,
            });
        }
        self.ensure_liquidity(amount)?;

        let interest_portion = amount.min(account.supply.accrued_interest);
        let principal_portion = math::sub(amount, interest_portion)?;
        account.supply.accrued_interest = math::sub(account.supply.accrued_interest, interest_portion)?;
        account.supply.principal = math::sub(account.supply.principal, principal_portion)?;
        if account.supply.principal.is_zero() {
            account.supply.last_accrual = 0;
        }
        self.pool.total_supplied = math::sub(self.pool.total_supplied, principal_portion)?;
        self.accounts.insert(id.clone(), account);
        self.emit(LendingEvent::Withdrawn {
            account: id.clone(),
            amount,
            interest_portion,
        });

        self.asset_token
            .transfer_out(id, amount)
            .map_err(|e| transfer_failed("withdraw_supply", e))?;

        tracing::info!(
            account = %id,
            amount = %amount,
            interest_portion = %interest_portion,
            "Supply withdrawn"
        );
        Ok(())
    }

    /// Pay out credited supply interest, leaving principal untouched
    pub fn claim_supply_interest(&mut self, account: &AccountId) -> Result<Amount, LendingError> {
        let now = self.clock.now();
        let checkpoint = self.checkpoint(&[account]);
        let result = self.apply_claim_supply_interest(account, now);
        self.finish("claim_supply_interest", checkpoint, now, result)
    }

    fn apply_claim_supply_interest(&mut self, id: &AccountId, now: u64) -> Result<Amount, LendingError> {
        let mut account = self.load(id);
        self.accrue_supply(id, &mut account, now)?;

        let interest = account.supply.accrued_interest;
        ensure_positive(interest)?;
        self.ensure_liquidity(interest)?;

        account.supply.accrued_interest = Amount::ZERO;
        self.accounts.insert(id.clone(), account);
        self.emit(LendingEvent::Withdrawn {
            account: id.clone(),
            amount: interest,
            interest_portion: interest,
        });

        self.asset_token
            .transfer_out(id, interest)
            .map_err(|e| transfer_failed("claim_supply_interest", e))?;

        tracing::info!(account = %id, interest = %interest, "Supply interest claimed");
        Ok(interest)
    }

    // === Collateral ===

    /// Pledge collateral
    pub fn deposit_collateral(&mut self, account: &AccountId, amount: Amount) -> Result<(), LendingError> {
        let now = self.clock.now();
        let checkpoint = self.checkpoint(&[account]);
        let result = self.apply_deposit_collateral(account, amount);
        self.finish("deposit_collateral", checkpoint, now, result)
    }

    fn apply_deposit_collateral(&mut self, id: &AccountId, amount: Amount) -> Result<(), LendingError> {
        ensure_positive(amount)?;
        let mut account = self.load(id);

        account.collateral = math::add(account.collateral, amount)?;
        self.pool.total_collateral = math::add(self.pool.total_collateral, amount)?;
        self.accounts.insert(id.clone(), account);
        self.emit(LendingEvent::CollateralDeposited {
            account: id.clone(),
            amount,
        });

        self.collateral_token
            .transfer_in(id, amount)
            .map_err(|e| transfer_failed("deposit_collateral", e))?;

        tracing::info!(account = %id, amount = %amount, "Collateral deposited");
        Ok(())
    }

    /// Release collateral as long as the position stays healthy
    pub fn withdraw_collateral(&mut self, account: &AccountId, amount: Amount) -> Result<(), LendingError> {
        let now = self.clock.now();
        let checkpoint = self.checkpoint(&[account]);
        let result = self.apply_withdraw_collateral(account, amount, now);
        self.finish("withdraw_collateral", checkpoint, now, result)
    }

    fn apply_withdraw_collateral(
        &mut self,
        id: &AccountId,
        amount: Amount,
        now: u64,
    ) -> Result<(), LendingError> {
        ensure_positive(amount)?;
        let mut account = self.load(id);
        if amount > account.collateral {
            return Err(LendingError::InsufficientCollateral {
                account: id.to_string(),
                available: account.collateral,
                requested: amount,
            });
        }
        self.accrue_borrow(id, &mut account, now)?;

        let remaining = math::sub(account.collateral, amount)?;
        if account.borrow.has_debt() {
            let health_factor =
                self.risk
                    .health_factor(remaining, account.borrow.principal, &self.pool.params)?;
            tracing::debug!(account = %id, health_factor, "Post-withdrawal health checked");
            if health_factor < MIN_HEALTH_FACTOR {
                return Err(LendingError::HealthFactorTooLow {
                    account: id.to_string(),
                    health_factor,
                });
            }
        }

        account.collateral = remaining;
        self.pool.total_collateral = math::sub(self.pool.total_collateral, amount)?;
        self.accounts.insert(id.clone(), account);
        self.emit(LendingEvent::CollateralWithdrawn {
            account: id.clone(),
            amount,
        });

        self.collateral_token
            .transfer_out(id, amount)
            .map_err(|e| transfer_failed("withdraw_collateral", e))?;

        tracing::info!(account = %id, amount = %amount, "Collateral withdrawn");
        Ok(())
    }

    // === Borrow side ===

    /// Borrow against pledged collateral
    pub fn borrow(&mut self, account: &AccountId, amount: Amount) -> Result<(), LendingError> {
        let now = self.clock.now();
        let checkpoint = self.checkpoint(&[account]);
        let result = self.apply_borrow(account, amount, now);
        self.finish("borrow", checkpoint, now, result)
    }

    fn apply_borrow(&mut self, id: &AccountId, amount: Amount, now: u64) -> Result<(), LendingError> {
        ensure_positive(amount)?;
        let mut account = self.load(id);
        if account.collateral.is_zero() {
            return Err(LendingError::InsufficientCollateral {
                account: id.to_string(),
                available: Amount::ZERO,
                requested: amount,
            });
        }
        self.accrue_borrow(id, &mut account, now)?;

        let price = self.risk.collateral_price()?;
        let limit = price.borrow_limit(account.collateral, &self.pool.params)?;
        let debt = math::add(account.borrow.principal, amount)?;
        if debt > limit {
            return Err(LendingError::BorrowExceedsLimit {
                account: id.to_string(),
                debt,
                limit,
            });
        }
        self.ensure_liquidity(amount)?;
        let total_borrowed = math::add(self.pool.total_borrowed, amount)?;
        if total_borrowed > self.pool.total_supplied {
            return Err(LendingError::InsufficientLiquidity {
                available: self.pool.total_supplied.saturating_sub(self.pool.total_borrowed),
                requested: amount,
            });
        }

        account.borrow.principal = debt;
        self.pool.total_borrowed = total_borrowed;
        self.accounts.insert(id.clone(), account);
        self.emit(LendingEvent::Borrowed {
            account: id.clone(),
            amount,
            total_debt: debt,
        });

        self.asset_token
            .transfer_out(id, amount)
            .map_err(|e| transfer_failed("borrow", e))?;

        tracing::info!(account = %id, amount = %amount, total_debt = %debt, "Borrowed");
        Ok(())
    }

    /// Repay debt; returns the amount actually pulled (at most the debt)
    pub fn repay(&mut self, account: &AccountId, amount: Amount) -> Result<Amount, LendingError> {
        let now = self.clock.now();
        let checkpoint = self.checkpoint(&[account]);
        let result = self.apply_repay(account, amount, now);
        self.finish("repay", checkpoint, now, result)
    }

    fn apply_repay(&mut self, id: &AccountId, amount: Amount, now: u64) -> Result<Amount, LendingError> {
        ensure_positive(amount)?;
        let mut account = self.load(id);
        self.accrue_borrow(id, &mut account, now)?;
        if !account.borrow.has_debt() {
            return Err(LendingError::NoDebt {
                account: id.to_string(),
            });
        }

        let actual = amount.min(account.borrow.principal);
        account.borrow.principal = math::sub(account.borrow.principal, actual)?;
        if !account.borrow.has_debt() {
            account.borrow.last_accrual = 0;
        }
        let remaining_debt = account.borrow.principal;
        self.pool.total_borrowed = math::sub(self.pool.total_borrowed, actual)?;
        self.accounts.insert(id.clone(), account);
        self.emit(LendingEvent::Repaid {
            account: id.clone(),
            amount: actual,
            remaining_debt,
        });

        self.asset_token
            .transfer_in(id, actual)
            .map_err(|e| transfer_failed("repay", e))?;

        tracing::info!(
            account = %id,
            amount = %actual,
            remaining_debt = %remaining_debt,
            "Repaid"
        );
        Ok(actual)
    }

    // === Shared plumbing ===

    /// Current record of `id`, or a fresh one
    pub(crate) fn load(&self, id: &AccountId) -> Account {
        self.accounts.get(id).cloned().unwrap_or_default()
    }

    pub(crate) fn accrue_supply(
        &mut self,
        id: &AccountId,
        account: &mut Account,
        now: u64,
    ) -> Result<(), LendingError> {
        let accrual =
            self.interest
                .accrue_supply(&mut account.supply, self.pool.params.supply_rate, now)?;
        if let Accrual::Credited(interest) = accrual {
            if !interest.is_zero() {
                tracing::debug!(account = %id, interest = %interest, "Supply interest accrued");
                self.emit(LendingEvent::SupplyInterestAccrued {
                    account: id.clone(),
                    interest,
                });
            }
        }
        Ok(())
    }

    /// Fold pending borrow interest into the debt and the pool total
    pub(crate) fn accrue_borrow(
        &mut self,
        id: &AccountId,
        account: &mut Account,
        now: u64,
    ) -> Result<(), LendingError> {
        let accrual =
            self.interest
                .accrue_borrow(&mut account.borrow, self.pool.params.borrow_rate, now)?;
        if let Accrual::Credited(interest) = accrual {
            if !interest.is_zero() {
                self.pool.total_borrowed = math::add(self.pool.total_borrowed, interest)?;
                tracing::debug!(account = %id, interest = %interest, "Borrow interest accrued");
                self.emit(LendingEvent::BorrowInterestAccrued {
                    account: id.clone(),
                    interest,
                });
            }
        }
        Ok(())
    }

    /// Custody must hold at least `amount` of the borrow asset
    fn ensure_liquidity(&self, amount: Amount) -> Result<(), LendingError> {
        let available = self.asset_token.custody_balance();
        if amount > available {
            return Err(LendingError::InsufficientLiquidity {
                available,
                requested: amount,
            });
        }
        Ok(())
    }

    pub(crate) fn emit(&mut self, event: LendingEvent) {
        self.pending.push(event);
    }

    pub(crate) fn checkpoint(&self, ids: &[&AccountId]) -> Checkpoint {
        Checkpoint {
            pool: self.pool.clone(),
            accounts: ids
                .iter()
                .map(|id| ((*id).clone(), self.accounts.get(*id).cloned()))
                .collect(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.pool = checkpoint.pool;
        for (id, account) in checkpoint.accounts {
            match account {
                Some(account) => {
                    self.accounts.insert(id, account);
                }
                None => {
                    self.accounts.remove(&id);
                }
            }
        }
        self.pending.clear();
    }

    /// Publish on success, roll back on failure
    pub(crate) fn finish<T>(
        &mut self,
        op: &'static str,
        checkpoint: Checkpoint,
        now: u64,
        result: Result<T, LendingError>,
    ) -> Result<T, LendingError> {
        match result {
            Ok(value) => {
                self.publish(now);
                Ok(value)
            }
            Err(err) => {
                self.restore(checkpoint);
                tracing::warn!(op, error = %err, "Operation rejected");
                Err(err)
            }
        }
    }

    fn publish(&mut self, now: u64) {
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            for sink in &self.sinks {
                if let Err(e) = sink.publish(now, event) {
                    tracing::error!(event = event.kind(), error = %e, "Event sink failed");
                }
            }
        }
    }

    /// Replace the parameters after the caller passed the admin check
    pub(crate) fn set_params(&mut self, params: PoolParams) {
        self.pool.params = params;
    }
}

pub(crate) fn ensure_positive(amount: Amount) -> Result<(), LendingError> {
    if amount.is_zero() {
        return Err(LendingError::ZeroAmount);
    }
    Ok(())
}

pub(crate) fn transfer_failed(op: &'static str, err: TransferError) -> LendingError {
    tracing::error!(op, error = %err, "Token transfer failed");
    LendingError::Transfer(err)
}
