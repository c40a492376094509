//! Token transfer interface

use lendpool_core::{AccountId, Amount, AssetId};

use crate::TransferError;

/// Custody movement for one token.
///
/// `transfer_in` pulls from a participant into pool custody,
/// `transfer_out` pays from pool custody to a participant. A returned
/// error means nothing moved.
pub trait AssetTransfer: Send + Sync {
    /// Token handled by this instance
    fn asset(&self) -> &AssetId;

    /// Pull `amount` from `from` into custody
    fn transfer_in(&self, from: &AccountId, amount: Amount) -> Result<(), TransferError>;

    /// Pay `amount` out of custody to `to`
    fn transfer_out(&self, to: &AccountId, amount: Amount) -> Result<(), TransferError>;

    /// Tokens currently held by the pool
    fn custody_balance(&self) -> Amount;
}
