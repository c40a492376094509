//! Interest Accrual Module
//!
//! Simple interest per accrual window, charged at the start of every
//! mutating call on a position:
//!
//! ```text
//! interest = principal * rate * elapsed / (RATE_PRECISION * SECONDS_PER_YEAR)
//! ```
//!
//! Borrow interest is folded into the principal, so debt compounds at each
//! accrual boundary. Supply interest accumulates next to the principal.

use lendpool_core::math::{self, RATE_PRECISION, SECONDS_PER_YEAR};
use lendpool_core::{Amount, MathError};

use crate::position::{BorrowPosition, SupplyPosition};

/// Outcome of one accrual pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accrual {
    /// First touch: the timestamp was set, nothing credited
    Started,
    /// No time has passed since the last accrual
    Unchanged,
    /// Interest credited for the elapsed window (may be zero)
    Credited(Amount),
}

impl Accrual {
    /// Interest credited by this pass
    pub fn interest(&self) -> Amount {
        match self {
            Accrual::Credited(interest) => *interest,
            Accrual::Started | Accrual::Unchanged => Amount::ZERO,
        }
    }
}

/// Interest accrual calculator
#[derive(Debug, Default, Clone, Copy)]
pub struct InterestAccrualEngine;

impl InterestAccrualEngine {
    pub fn new() -> Self {
        Self
    }

    /// Interest on `principal` at an annualized `rate` over `elapsed` seconds
    pub fn interest(&self, principal: Amount, rate: u128, elapsed: u64) -> Result<Amount, MathError> {
        let interest = math::mul_mul_div(
            principal.value(),
            rate,
            elapsed as u128,
            RATE_PRECISION * SECONDS_PER_YEAR,
        )?;
        Ok(Amount::new(interest))
    }

    /// What an accrual at `now` would do, without touching the position
    fn evaluate(
        &self,
        principal: Amount,
        rate: u128,
        last_accrual: u64,
        now: u64,
    ) -> Result<Accrual, MathError> {
        if last_accrual == 0 {
            return Ok(Accrual::Started);
        }
        let elapsed = now.saturating_sub(last_accrual);
        if elapsed == 0 {
            return Ok(Accrual::Unchanged);
        }
        Ok(Accrual::Credited(self.interest(principal, rate, elapsed)?))
    }

    /// Fold pending interest into the debt
    pub fn accrue_borrow(
        &self,
        position: &mut BorrowPosition,
        rate: u128,
        now: u64,
    ) -> Result<Accrual, MathError> {
        let accrual = self.evaluate(position.principal, rate, position.last_accrual, now)?;
        match accrual {
            Accrual::Started => position.last_accrual = now,
            Accrual::Unchanged => {}
            Accrual::Credited(interest) => {
                position.principal = math::add(position.principal, interest)?;
                position.last_accrual = now;
            }
        }
        Ok(accrual)
    }

    /// Credit pending interest next to the supplied principal
    pub fn accrue_supply(
        &self,
        position: &mut SupplyPosition,
        rate: u128,
        now: u64,
    ) -> Result<Accrual, MathError> {
        let accrual = self.evaluate(position.principal, rate, position.last_accrual, now)?;
        match accrual {
            Accrual::Started => position.last_accrual = now,
            Accrual::Unchanged => {}
            Accrual::Credited(interest) => {
                position.accrued_interest = math::add(position.accrued_interest, interest)?;
                position.last_accrual = now;
            }
        }
        Ok(accrual)
    }

    /// Debt as of `now`, read-only
    pub fn preview_debt(
        &self,
        position: &BorrowPosition,
        rate: u128,
        now: u64,
    ) -> Result<Amount, MathError> {
        let mut copy = *position;
        self.accrue_borrow(&mut copy, rate, now)?;
        Ok(copy.principal)
    }

    /// Credited supply interest as of `now`, read-only
    pub fn preview_supply_interest(
        &self,
        position: &SupplyPosition,
        rate: u128,
        now: u64,
    ) -> Result<Amount, MathError> {
        let mut copy = *position;
        self.accrue_supply(&mut copy, rate, now)?;
        Ok(copy.accrued_interest)
    }
}
