//! Risk engine implementation

use lendpool_core::math::{self, BPS_DENOMINATOR, HEALTH_FACTOR_INFINITE, MIN_HEALTH_FACTOR};
use lendpool_core::{Amount, AssetId, PoolParams};
use lendpool_oracle::PriceOracle;
use std::sync::Arc;

use crate::error::RiskError;

/// One validated oracle reading for the collateral asset.
///
/// Every check within a single operation runs against the same reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollateralPrice {
    /// Strictly positive answer
    pub price: u128,
    /// Answer scale
    pub decimals: u8,
}

impl CollateralPrice {
    /// `amount * price / 10^decimals`
    pub fn value_of(&self, amount: Amount) -> Result<Amount, RiskError> {
        let scale = math::pow10(self.decimals)?;
        Ok(Amount::new(math::mul_div(amount.value(), self.price, scale)?))
    }

    /// Collateral units worth `value`: `value * 10^decimals / price`
    pub fn amount_for_value(&self, value: Amount) -> Result<Amount, RiskError> {
        let scale = math::pow10(self.decimals)?;
        Ok(Amount::new(math::mul_div(value.value(), scale, self.price)?))
    }

    /// Health factor in basis points (10000 == 1.0); `u128::MAX` without debt
    pub fn health_factor(
        &self,
        collateral: Amount,
        debt: Amount,
        params: &PoolParams,
    ) -> Result<u128, RiskError> {
        if debt.is_zero() {
            return Ok(HEALTH_FACTOR_INFINITE);
        }
        let value = self.value_of(collateral)?;
        let adjusted = math::bps_mul(value.value(), params.liquidation_threshold_bps)?;
        Ok(math::mul_div(adjusted, BPS_DENOMINATOR, debt.value())?)
    }

    /// Borrow ceiling: `collateralValue * maxLTV / 10000`
    pub fn borrow_limit(&self, collateral: Amount, params: &PoolParams) -> Result<Amount, RiskError> {
        let value = self.value_of(collateral)?;
        Ok(Amount::new(math::bps_mul(value.value(), params.max_ltv_bps)?))
    }
}

/// Risk Engine - collateral valuation and position health
///
/// Holds the price feed for the collateral asset. Parameters are passed
/// per call because the pool may update them between operations.
pub struct RiskEngine {
    oracle: Arc<dyn PriceOracle>,
    collateral_asset: AssetId,
}

impl RiskEngine {
    pub fn new(oracle: Arc<dyn PriceOracle>, collateral_asset: AssetId) -> Self {
        Self {
            oracle,
            collateral_asset,
        }
    }

    pub fn collateral_asset(&self) -> &AssetId {
        &self.collateral_asset
    }

    /// Read and validate the current collateral price
    pub fn collateral_price(&self) -> Result<CollateralPrice, RiskError> {
        let reading = self
            .oracle
            .get_price(&self.collateral_asset)
            .map_err(|e| RiskError::InvalidOraclePrice {
                asset: self.collateral_asset.to_string(),
                reason: e.to_string(),
            })?;

        let price = reading
            .positive_answer()
            .map_err(|e| RiskError::InvalidOraclePrice {
                asset: self.collateral_asset.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(asset = %self.collateral_asset, price, "Collateral price read");

        Ok(CollateralPrice {
            price,
            decimals: self.oracle.decimals(),
        })
    }

    /// Value of `amount` collateral in borrow-asset units
    pub fn collateral_value(&self, amount: Amount) -> Result<Amount, RiskError> {
        self.collateral_price()?.value_of(amount)
    }

    /// Health factor in basis points; no oracle read when there is no debt
    pub fn health_factor(
        &self,
        collateral: Amount,
        debt: Amount,
        params: &PoolParams,
    ) -> Result<u128, RiskError> {
        if debt.is_zero() {
            return Ok(HEALTH_FACTOR_INFINITE);
        }
        self.collateral_price()?.health_factor(collateral, debt, params)
    }

    /// Remaining borrow capacity, floored at zero
    pub fn max_borrowable(
        &self,
        collateral: Amount,
        debt: Amount,
        params: &PoolParams,
    ) -> Result<Amount, RiskError> {
        let limit = self.collateral_price()?.borrow_limit(collateral, params)?;
        Ok(limit.saturating_sub(debt))
    }

    /// Debt exists and health factor is below 1.0
    pub fn can_liquidate(
        &self,
        collateral: Amount,
        debt: Amount,
        params: &PoolParams,
    ) -> Result<bool, RiskError> {
        if debt.is_zero() {
            return Ok(false);
        }
        Ok(self.health_factor(collateral, debt, params)? < MIN_HEALTH_FACTOR)
    }
}
