//! Pool risk and rate parameters

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::BPS_DENOMINATOR;

/// Cross-parameter invariant violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("max LTV {max_ltv} bp must be below liquidation threshold {threshold} bp")]
    LtvNotBelowThreshold { max_ltv: u128, threshold: u128 },

    #[error("liquidation threshold {0} bp exceeds 10000")]
    ThresholdTooHigh(u128),

    #[error("max LTV must be positive")]
    ZeroLtv,

    #[error("supply rate {supply} must be below borrow rate {borrow}")]
    SupplyRateNotBelowBorrow { supply: u128, borrow: u128 },

    #[error("liquidation bonus {0} bp exceeds 10000")]
    BonusTooHigh(u128),

    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    #[error("{role} token mismatch: configured {expected}, got {actual}")]
    AssetMismatch {
        role: &'static str,
        expected: String,
        actual: String,
    },
}

/// Risk and rate parameters of the pool.
///
/// LTV, threshold and bonus are basis points; rates are annualized and
/// scaled by 1e18.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    pub max_ltv_bps: u128,
    pub liquidation_threshold_bps: u128,
    pub liquidation_bonus_bps: u128,
    pub borrow_rate: u128,
    pub supply_rate: u128,
}

impl PoolParams {
    /// Check every cross-parameter invariant
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_ltv_bps == 0 {
            return Err(ParamsError::ZeroLtv);
        }
        if self.liquidation_threshold_bps > BPS_DENOMINATOR {
            return Err(ParamsError::ThresholdTooHigh(self.liquidation_threshold_bps));
        }
        if self.max_ltv_bps >= self.liquidation_threshold_bps {
            return Err(ParamsError::LtvNotBelowThreshold {
                max_ltv: self.max_ltv_bps,
                threshold: self.liquidation_threshold_bps,
            });
        }
        if self.supply_rate >= self.borrow_rate {
            return Err(ParamsError::SupplyRateNotBelowBorrow {
                supply: self.supply_rate,
                borrow: self.borrow_rate,
            });
        }
        if self.liquidation_bonus_bps > BPS_DENOMINATOR {
            return Err(ParamsError::BonusTooHigh(self.liquidation_bonus_bps));
        }
        Ok(())
    }

    /// Copy with a new borrow rate, validated
    pub fn with_borrow_rate(self, borrow_rate: u128) -> Result<Self, ParamsError> {
        let next = Self { borrow_rate, ..self };
        next.validate()?;
        Ok(next)
    }

    /// Copy with a new supply rate, validated
    pub fn with_supply_rate(self, supply_rate: u128) -> Result<Self, ParamsError> {
        let next = Self { supply_rate, ..self };
        next.validate()?;
        Ok(next)
    }

    /// Copy with a new max LTV, validated
    pub fn with_max_ltv(self, max_ltv_bps: u128) -> Result<Self, ParamsError> {
        let next = Self { max_ltv_bps, ..self };
        next.validate()?;
        Ok(next)
    }

    /// Copy with a new liquidation threshold, validated
    pub fn with_liquidation_threshold(self, threshold_bps: u128) -> Result<Self, ParamsError> {
        let next = Self {
            liquidation_threshold_bps: threshold_bps,
            ..self
        };
        next.validate()?;
        Ok(next)
    }
}
