//! Transfer error types

use lendpool_core::Amount;
use thiserror::Error;

/// Token movement failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient {asset} balance for {holder}: available {available}, required {required}")]
    InsufficientBalance {
        asset: String,
        holder: String,
        available: Amount,
        required: Amount,
    },

    #[error("{asset} transfer rejected: {reason}")]
    Rejected { asset: String, reason: String },

    #[error("{asset} balance overflow")]
    Overflow { asset: String },
}
