//! Oracle error types

use thiserror::Error;

/// Oracle-related errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// No feed configured for the asset
    #[error("No price feed for {asset}")]
    AssetNotFound { asset: String },

    /// Feed answered with an unusable value
    #[error("Invalid price for {asset}: {reason}")]
    InvalidPrice { asset: String, reason: String },

    /// Feed could not be reached
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}
