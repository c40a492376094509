//! Liquidation of under-collateralized positions
//!
//! A liquidator repays part or all of a borrower's debt and receives
//! collateral worth the repaid value plus a bonus:
//!
//! ```text
//! valueWithBonus    = debtCovered * (10000 + bonus) / 10000
//! collateralSeized  = valueWithBonus * 10^decimals / price
//! ```
//!
//! The seizure is capped at the borrower's collateral, so a deeply
//! underwater position pays a smaller bonus.

use lendpool_core::math::{self, BPS_DENOMINATOR, HEALTH_FACTOR_INFINITE, MIN_HEALTH_FACTOR};
use lendpool_core::{AccountId, Amount};
use lendpool_risk::{CollateralPrice, RiskError};
use serde::{Deserialize, Serialize};

use crate::error::LendingError;
use crate::event::LendingEvent;
use crate::ledger::{ensure_positive, transfer_failed, Ledger};

/// Computed split of one liquidation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seizure {
    /// Debt repaid by the liquidator
    pub debt_covered: Amount,
    /// Collateral handed to the liquidator
    pub collateral_seized: Amount,
    /// Collateral the full bonus would have required
    pub nominal_collateral: Amount,
    /// Seizure was limited by the borrower's balance
    pub capped: bool,
}

/// Outcome of a committed liquidation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationResult {
    pub borrower: AccountId,
    pub liquidator: AccountId,
    pub debt_covered: Amount,
    pub collateral_seized: Amount,
    /// Borrower debt left after the liquidation
    pub remaining_debt: Amount,
    pub capped: bool,
}

/// Stateless seizure calculator
#[derive(Debug, Default, Clone, Copy)]
pub struct LiquidationEngine;

impl LiquidationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Split a liquidation of `requested` debt against the borrower's position
    pub fn seizure(
        &self,
        price: &CollateralPrice,
        requested: Amount,
        debt: Amount,
        collateral: Amount,
        bonus_bps: u128,
    ) -> Result<Seizure, RiskError> {
        let debt_covered = requested.min(debt);
        let value_with_bonus =
            math::mul_div(debt_covered.value(), BPS_DENOMINATOR + bonus_bps, BPS_DENOMINATOR)?;
        let nominal_collateral = price.amount_for_value(Amount::new(value_with_bonus))?;
        let capped = nominal_collateral > collateral;

        Ok(Seizure {
            debt_covered,
            collateral_seized: nominal_collateral.min(collateral),
            nominal_collateral,
            capped,
        })
    }
}

impl Ledger {
    /// Repay part of an unhealthy borrower's debt in exchange for collateral
    pub fn liquidate(
        &mut self,
        liquidator: &AccountId,
        borrower: &AccountId,
        debt_to_cover: Amount,
    ) -> Result<LiquidationResult, LendingError> {
        let now = self.clock.now();
        let checkpoint = self.checkpoint(&[borrower]);
        let result = self.apply_liquidate(liquidator, borrower, debt_to_cover, now);
        self.finish("liquidate", checkpoint, now, result)
    }

    fn apply_liquidate(
        &mut self,
        liquidator: &AccountId,
        borrower: &AccountId,
        debt_to_cover: Amount,
        now: u64,
    ) -> Result<LiquidationResult, LendingError> {
        ensure_positive(debt_to_cover)?;
        let mut account = self.load(borrower);
        self.accrue_borrow(borrower, &mut account, now)?;

        if !account.borrow.has_debt() {
            return Err(LendingError::PositionHealthy {
                account: borrower.to_string(),
                health_factor: HEALTH_FACTOR_INFINITE,
            });
        }

        let price = self.risk.collateral_price()?;
        let health_factor =
            price.health_factor(account.collateral, account.borrow.principal, &self.pool.params)?;
        if health_factor >= MIN_HEALTH_FACTOR {
            return Err(LendingError::PositionHealthy {
                account: borrower.to_string(),
                health_factor,
            });
        }

        let seizure = self.liquidation.seizure(
            &price,
            debt_to_cover,
            account.borrow.principal,
            account.collateral,
            self.pool.params.liquidation_bonus_bps,
        )?;
        tracing::debug!(
            borrower = %borrower,
            health_factor,
            debt_covered = %seizure.debt_covered,
            collateral_seized = %seizure.collateral_seized,
            capped = seizure.capped,
            "Liquidation computed"
        );

        account.borrow.principal = math::sub(account.borrow.principal, seizure.debt_covered)?;
        if !account.borrow.has_debt() {
            account.borrow.last_accrual = 0;
        }
        account.collateral = math::sub(account.collateral, seizure.collateral_seized)?;
        let remaining_debt = account.borrow.principal;
        self.pool.total_borrowed = math::sub(self.pool.total_borrowed, seizure.debt_covered)?;
        self.pool.total_collateral =
            math::sub(self.pool.total_collateral, seizure.collateral_seized)?;
        self.accounts.insert(borrower.clone(), account);
        self.emit(LendingEvent::Liquidated {
            borrower: borrower.clone(),
            liquidator: liquidator.clone(),
            debt_covered: seizure.debt_covered,
            collateral_seized: seizure.collateral_seized,
        });

        self.asset_token
            .transfer_in(liquidator, seizure.debt_covered)
            .map_err(|e| transfer_failed("liquidate", e))?;

        if let Err(err) = self
            .collateral_token
            .transfer_out(liquidator, seizure.collateral_seized)
        {
            // Hand the repayment back before the state rollback
            if let Err(refund) = self.asset_token.transfer_out(liquidator, seizure.debt_covered) {
                tracing::error!(
                    liquidator = %liquidator,
                    amount = %seizure.debt_covered,
                    error = %refund,
                    "Liquidation refund failed"
                );
            }
            return Err(transfer_failed("liquidate", err));
        }

        tracing::info!(
            borrower = %borrower,
            liquidator = %liquidator,
            debt_covered = %seizure.debt_covered,
            collateral_seized = %seizure.collateral_seized,
            "Position liquidated"
        );

        Ok(LiquidationResult {
            borrower: borrower.clone(),
            liquidator: liquidator.clone(),
            debt_covered: seizure.debt_covered,
            collateral_seized: seizure.collateral_seized,
            remaining_debt,
            capped: seizure.capped,
        })
    }
}
