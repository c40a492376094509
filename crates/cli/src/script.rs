//! Simulation script format
//!
//! Amounts and prices are written in whole-token decimals and scaled to
//! base units when the script runs.

use lendpool_core::{AccountId, Amount};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which mock token a step refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    Borrow,
    Collateral,
}

/// One scripted action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Credit a wallet on a mock token
    Mint {
        token: Token,
        account: AccountId,
        amount: Decimal,
    },
    /// Move the collateral price
    SetPrice { price: Decimal },
    /// Move the clock forward
    Advance {
        #[serde(default)]
        days: u64,
        #[serde(default)]
        seconds: u64,
    },
    Supply { account: AccountId, amount: Decimal },
    WithdrawSupply { account: AccountId, amount: Decimal },
    ClaimInterest { account: AccountId },
    DepositCollateral { account: AccountId, amount: Decimal },
    WithdrawCollateral { account: AccountId, amount: Decimal },
    Borrow { account: AccountId, amount: Decimal },
    Repay { account: AccountId, amount: Decimal },
    Liquidate {
        liquidator: AccountId,
        borrower: AccountId,
        amount: Decimal,
    },
    UpdateBorrowRate { caller: AccountId, apr: Decimal },
    UpdateSupplyRate { caller: AccountId, apr: Decimal },
    UpdateMaxLtv { caller: AccountId, bps: u32 },
    UpdateLiquidationThreshold { caller: AccountId, bps: u32 },
    /// Print an account snapshot
    Inspect { account: AccountId },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Mint { .. } => "mint",
            Step::SetPrice { .. } => "set_price",
            Step::Advance { .. } => "advance",
            Step::Supply { .. } => "supply",
            Step::WithdrawSupply { .. } => "withdraw_supply",
            Step::ClaimInterest { .. } => "claim_interest",
            Step::DepositCollateral { .. } => "deposit_collateral",
            Step::WithdrawCollateral { .. } => "withdraw_collateral",
            Step::Borrow { .. } => "borrow",
            Step::Repay { .. } => "repay",
            Step::Liquidate { .. } => "liquidate",
            Step::UpdateBorrowRate { .. } => "update_borrow_rate",
            Step::UpdateSupplyRate { .. } => "update_supply_rate",
            Step::UpdateMaxLtv { .. } => "update_max_ltv",
            Step::UpdateLiquidationThreshold { .. } => "update_liquidation_threshold",
            Step::Inspect { .. } => "inspect",
        }
    }
}

/// A full simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Ledger clock at the first step
    #[serde(default = "default_start_time")]
    pub start_time: u64,

    /// Decimals of both tokens
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u8,

    #[serde(default = "default_oracle_decimals")]
    pub oracle_decimals: u8,

    /// Collateral price before the first step
    pub initial_price: Decimal,

    pub steps: Vec<Step>,
}

fn default_start_time() -> u64 {
    1_700_000_000
}

fn default_token_decimals() -> u8 {
    18
}

fn default_oracle_decimals() -> u8 {
    8
}

impl Script {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read script {}: {}", path.display(), e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn scale(decimals: u8) -> anyhow::Result<Decimal> {
    10u64
        .checked_pow(decimals as u32)
        .map(Decimal::from)
        .ok_or_else(|| anyhow::anyhow!("unsupported decimals {}", decimals))
}

/// Whole-token decimal to base units; rejects negatives and excess precision
pub fn to_base_units(value: Decimal, decimals: u8) -> anyhow::Result<Amount> {
    if value.is_sign_negative() {
        anyhow::bail!("negative amount {}", value);
    }
    let scaled = value
        .checked_mul(scale(decimals)?)
        .ok_or_else(|| anyhow::anyhow!("amount {} out of range", value))?;
    if !scaled.fract().is_zero() {
        anyhow::bail!("amount {} has more than {} decimals", value, decimals);
    }
    scaled
        .to_u128()
        .map(Amount::new)
        .ok_or_else(|| anyhow::anyhow!("amount {} out of range", value))
}

/// Decimal price to an oracle answer
pub fn to_answer(price: Decimal, decimals: u8) -> anyhow::Result<i128> {
    let scaled = price
        .checked_mul(scale(decimals)?)
        .ok_or_else(|| anyhow::anyhow!("price {} out of range", price))?;
    scaled
        .trunc()
        .to_i128()
        .ok_or_else(|| anyhow::anyhow!("price {} out of range", price))
}

/// Base units back to a trimmed decimal string
pub fn format_units(amount: Amount, decimals: u8) -> String {
    let raw = amount.value();
    let Some(unit) = 10u128.checked_pow(decimals as u32) else {
        return raw.to_string();
    };
    let whole = raw / unit;
    let frac = raw % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
