//! Ledger errors
//!
//! Every variant is a rejected precondition. A failed operation leaves the
//! pool, every account and every custody balance exactly as they were.

use lendpool_core::{Amount, MathError, ParamsError};
use lendpool_custody::TransferError;
use lendpool_risk::RiskError;
use thiserror::Error;

/// Errors returned by ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LendingError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Insufficient collateral for {account}: available {available}, requested {requested}")]
    InsufficientCollateral {
        account: String,
        available: Amount,
        requested: Amount,
    },

    #[error("Insufficient supply for {account}: entitled to {available}, requested {requested}")]
    InsufficientSupply {
        account: String,
        available: Amount,
        requested: Amount,
    },

    #[error("Borrow exceeds limit for {account}: debt would be {debt}, limit {limit}")]
    BorrowExceedsLimit {
        account: String,
        debt: Amount,
        limit: Amount,
    },

    #[error("Health factor too low for {account}: {health_factor} bp")]
    HealthFactorTooLow { account: String, health_factor: u128 },

    #[error("Position of {account} is healthy: {health_factor} bp")]
    PositionHealthy { account: String, health_factor: u128 },

    #[error("{account} has no debt")]
    NoDebt { account: String },

    #[error("Insufficient liquidity: available {available}, requested {requested}")]
    InsufficientLiquidity { available: Amount, requested: Amount },

    #[error("Invalid oracle price for {asset}: {reason}")]
    InvalidOraclePrice { asset: String, reason: String },

    #[error("{caller} is not the pool admin")]
    Unauthorized { caller: String },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] ParamsError),

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Math error: {0}")]
    MathOverflow(#[from] MathError),
}

impl From<RiskError> for LendingError {
    fn from(err: RiskError) -> Self {
        match err {
            RiskError::InvalidOraclePrice { asset, reason } => {
                LendingError::InvalidOraclePrice { asset, reason }
            }
            RiskError::Math(e) => LendingError::MathOverflow(e),
        }
    }
}
