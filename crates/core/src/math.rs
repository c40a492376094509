//! Fixed-point helpers
//!
//! Every product is formed in 256-bit space and divided exactly once, so
//! truncation happens at the end of a calculation and never in the middle.

use alloy_primitives::U256;
use thiserror::Error;

use crate::Amount;

/// Basis-point denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Scale of annualized rates (1e18 = 100% APR)
pub const RATE_PRECISION: u128 = 1_000_000_000_000_000_000;

/// 365 days, leap years ignored
pub const SECONDS_PER_YEAR: u128 = 365 * 86_400;

/// Health factor of 1.0 in basis points
pub const MIN_HEALTH_FACTOR: u128 = BPS_DENOMINATOR;

/// Sentinel health factor for positions without debt
pub const HEALTH_FACTOR_INFINITE: u128 = u128::MAX;

/// Arithmetic failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,
}

fn narrow(value: U256) -> Result<u128, MathError> {
    u128::try_from(value).map_err(|_| MathError::Overflow)
}

/// `a * b / denominator`, truncating.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(MathError::Overflow)?;
    narrow(product / U256::from(denominator))
}

/// `a * b * c / denominator`, truncating. All three factors are multiplied
/// before the single division.
pub fn mul_mul_div(a: u128, b: u128, c: u128, denominator: u128) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .and_then(|ab| ab.checked_mul(U256::from(c)))
        .ok_or(MathError::Overflow)?;
    narrow(product / U256::from(denominator))
}

/// `value * bps / 10000`
pub fn bps_mul(value: u128, bps: u128) -> Result<u128, MathError> {
    mul_div(value, bps, BPS_DENOMINATOR)
}

/// `10^decimals`
pub fn pow10(decimals: u8) -> Result<u128, MathError> {
    10u128
        .checked_pow(decimals as u32)
        .ok_or(MathError::Overflow)
}

/// Checked amount addition
pub fn add(a: Amount, b: Amount) -> Result<Amount, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

/// Checked amount subtraction (underflow reported as overflow)
pub fn sub(a: Amount, b: Amount) -> Result<Amount, MathError> {
    a.checked_sub(b).ok_or(MathError::Overflow)
}
