//! Pool configuration
//!
//! Loaded from JSON. Rates are written as decimal APRs (`0.05` for 5%)
//! and converted to 1e18 fixed point when the ledger is built.

use lendpool_core::math::RATE_PRECISION;
use lendpool_core::{AccountId, AssetId, ParamsError, PoolParams};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Construction-time configuration of a pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Identity allowed to change parameters
    pub admin: AccountId,

    /// Interest-bearing asset that is supplied and borrowed
    pub borrow_asset: AssetId,

    /// Asset pledged against borrows
    pub collateral_asset: AssetId,

    #[serde(default = "default_max_ltv_bps")]
    pub max_ltv_bps: u32,

    #[serde(default = "default_liquidation_threshold_bps")]
    pub liquidation_threshold_bps: u32,

    /// Extra collateral paid to liquidators
    #[serde(default = "default_liquidation_bonus_bps")]
    pub liquidation_bonus_bps: u32,

    #[serde(default = "default_borrow_apr")]
    pub borrow_apr: Decimal,

    #[serde(default = "default_supply_apr")]
    pub supply_apr: Decimal,
}

fn default_max_ltv_bps() -> u32 {
    7_500
}

fn default_liquidation_threshold_bps() -> u32 {
    8_000
}

fn default_liquidation_bonus_bps() -> u32 {
    500
}

fn default_borrow_apr() -> Decimal {
    Decimal::new(5, 2)
}

fn default_supply_apr() -> Decimal {
    Decimal::new(2, 2)
}

impl PoolConfig {
    /// Config with default risk parameters
    pub fn new(admin: AccountId, borrow_asset: AssetId, collateral_asset: AssetId) -> Self {
        Self {
            admin,
            borrow_asset,
            collateral_asset,
            max_ltv_bps: default_max_ltv_bps(),
            liquidation_threshold_bps: default_liquidation_threshold_bps(),
            liquidation_bonus_bps: default_liquidation_bonus_bps(),
            borrow_apr: default_borrow_apr(),
            supply_apr: default_supply_apr(),
        }
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Fixed-point parameters, validated
    pub fn params(&self) -> Result<PoolParams, ParamsError> {
        let params = PoolParams {
            max_ltv_bps: self.max_ltv_bps as u128,
            liquidation_threshold_bps: self.liquidation_threshold_bps as u128,
            liquidation_bonus_bps: self.liquidation_bonus_bps as u128,
            borrow_rate: apr_to_rate(self.borrow_apr)?,
            supply_rate: apr_to_rate(self.supply_apr)?,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Convert a decimal APR to a 1e18-scaled rate, truncating below 1e-18
pub fn apr_to_rate(apr: Decimal) -> Result<u128, ParamsError> {
    if apr.is_sign_negative() {
        return Err(ParamsError::InvalidRate(format!("negative APR {apr}")));
    }
    let precision = Decimal::from(RATE_PRECISION as u64);
    apr.checked_mul(precision)
        .and_then(|scaled| scaled.trunc().to_u128())
        .ok_or_else(|| ParamsError::InvalidRate(format!("APR {apr} out of range")))
}
