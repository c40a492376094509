//! Lendpool Custody
//!
//! The ledger never moves tokens itself; it drives one `AssetTransfer`
//! per token (borrow asset and collateral asset). `MockToken` is an
//! in-memory token with wallet balances and failure injection.

mod error;
mod mock;
mod types;

pub use error::TransferError;
pub use mock::MockToken;
pub use types::AssetTransfer;
