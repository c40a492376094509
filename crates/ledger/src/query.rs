//! Read-only views over the ledger
//!
//! Debt and supply interest are previewed to the current clock without
//! touching stored positions.

use lendpool_core::math::{self, BPS_DENOMINATOR, MIN_HEALTH_FACTOR};
use lendpool_core::{AccountId, Amount, PoolParams};
use lendpool_risk::CollateralPrice;
use serde::{Deserialize, Serialize};

use crate::error::LendingError;
use crate::ledger::Ledger;
use crate::state::{Account, Pool};

/// Supply side of an account as of now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyBalance {
    pub principal: Amount,
    /// Credited plus pending interest
    pub interest: Amount,
    pub total: Amount,
}

/// Health of a borrowing position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    Healthy,
    Liquidatable,
}

/// Lifecycle stage derived from balances and the live price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Empty,
    Supplied,
    Collateralized,
    Borrowing(Health),
}

/// Everything known about one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account: AccountId,
    pub supply: SupplyBalance,
    pub collateral: Amount,
    pub collateral_value: Amount,
    pub debt: Amount,
    /// Basis points; `u128::MAX` without debt
    pub health_factor: u128,
    pub max_borrowable: Amount,
    pub status: PositionStatus,
}

impl Ledger {
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn params(&self) -> &PoolParams {
        &self.pool.params
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// All accounts in identity order
    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &Account)> {
        self.accounts.iter()
    }

    /// Debt including interest pending since the last accrual
    pub fn current_debt(&self, id: &AccountId) -> Result<Amount, LendingError> {
        let account = self.load(id);
        self.preview_debt(&account)
    }

    pub fn supply_balance(&self, id: &AccountId) -> Result<SupplyBalance, LendingError> {
        let account = self.load(id);
        let interest = self.interest.preview_supply_interest(
            &account.supply,
            self.pool.params.supply_rate,
            self.clock.now(),
        )?;
        Ok(SupplyBalance {
            principal: account.supply.principal,
            interest,
            total: math::add(account.supply.principal, interest)?,
        })
    }

    pub fn collateral_value(&self, id: &AccountId) -> Result<Amount, LendingError> {
        let account = self.load(id);
        Ok(self.risk.collateral_value(account.collateral)?)
    }

    pub fn health_factor(&self, id: &AccountId) -> Result<u128, LendingError> {
        let account = self.load(id);
        let debt = self.preview_debt(&account)?;
        Ok(self
            .risk
            .health_factor(account.collateral, debt, &self.pool.params)?)
    }

    pub fn max_borrowable(&self, id: &AccountId) -> Result<Amount, LendingError> {
        let account = self.load(id);
        let debt = self.preview_debt(&account)?;
        Ok(self
            .risk
            .max_borrowable(account.collateral, debt, &self.pool.params)?)
    }

    pub fn can_liquidate(&self, id: &AccountId) -> Result<bool, LendingError> {
        let account = self.load(id);
        let debt = self.preview_debt(&account)?;
        Ok(self
            .risk
            .can_liquidate(account.collateral, debt, &self.pool.params)?)
    }

    pub fn position_status(&self, id: &AccountId) -> Result<PositionStatus, LendingError> {
        let account = self.load(id);
        let debt = self.preview_debt(&account)?;
        if debt.is_zero() {
            return Ok(idle_status(&account));
        }
        let price = self.risk.collateral_price()?;
        let health_factor = price.health_factor(account.collateral, debt, &self.pool.params)?;
        Ok(borrowing_status(health_factor))
    }

    /// One consistent view of an account against a single price reading
    pub fn account_snapshot(&self, id: &AccountId) -> Result<AccountSnapshot, LendingError> {
        let account = self.load(id);
        let price = self.risk.collateral_price()?;
        let debt = self.preview_debt(&account)?;
        let params = &self.pool.params;

        let health_factor = price.health_factor(account.collateral, debt, params)?;
        let status = if debt.is_zero() {
            idle_status(&account)
        } else {
            borrowing_status(health_factor)
        };

        Ok(AccountSnapshot {
            account: id.clone(),
            supply: self.supply_balance(id)?,
            collateral: account.collateral,
            collateral_value: price.value_of(account.collateral)?,
            debt,
            health_factor,
            max_borrowable: price
                .borrow_limit(account.collateral, params)?
                .saturating_sub(debt),
            status,
        })
    }

    /// `totalBorrowed * 10000 / totalSupplied`, zero for an empty pool
    pub fn utilization_bps(&self) -> Result<u128, LendingError> {
        if self.pool.total_supplied.is_zero() {
            return Ok(0);
        }
        Ok(math::mul_div(
            self.pool.total_borrowed.value(),
            BPS_DENOMINATOR,
            self.pool.total_supplied.value(),
        )?)
    }

    /// Borrowers whose health factor is below 1.0 right now
    pub fn liquidatable_accounts(&self) -> Result<Vec<AccountId>, LendingError> {
        let mut price: Option<CollateralPrice> = None;
        let mut liquidatable = Vec::new();

        for (id, account) in &self.accounts {
            let debt = self.preview_debt(account)?;
            if debt.is_zero() {
                continue;
            }
            let reading = match price {
                Some(reading) => reading,
                None => {
                    let reading = self.risk.collateral_price()?;
                    price = Some(reading);
                    reading
                }
            };
            if reading.health_factor(account.collateral, debt, &self.pool.params)? < MIN_HEALTH_FACTOR {
                liquidatable.push(id.clone());
            }
        }
        Ok(liquidatable)
    }

    fn preview_debt(&self, account: &Account) -> Result<Amount, LendingError> {
        Ok(self.interest.preview_debt(
            &account.borrow,
            self.pool.params.borrow_rate,
            self.clock.now(),
        )?)
    }
}

fn idle_status(account: &Account) -> PositionStatus {
    if !account.collateral.is_zero() {
        PositionStatus::Collateralized
    } else if !account.supply.is_empty() {
        PositionStatus::Supplied
    } else {
        PositionStatus::Empty
    }
}

fn borrowing_status(health_factor: u128) -> PositionStatus {
    if health_factor < MIN_HEALTH_FACTOR {
        PositionStatus::Borrowing(Health::Liquidatable)
    } else {
        PositionStatus::Borrowing(Health::Healthy)
    }
}
