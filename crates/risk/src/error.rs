//! Risk engine errors

use lendpool_core::MathError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiskError {
    #[error("Invalid oracle price for {asset}: {reason}")]
    InvalidOraclePrice { asset: String, reason: String },

    #[error(transparent)]
    Math(#[from] MathError),
}
