//! In-memory token
//!
//! Tracks participant wallets and the pool's custody balance. Transfers
//! can be switched to fail for rollback testing.

use lendpool_core::{AccountId, Amount, AssetId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::TransferError;
use crate::types::AssetTransfer;

#[derive(Debug, Default)]
struct Balances {
    wallets: HashMap<AccountId, Amount>,
    custody: Amount,
}

/// Mock token for tests and simulations
#[derive(Debug)]
pub struct MockToken {
    asset: AssetId,
    balances: Mutex<Balances>,
    fail_transfers: AtomicBool,
}

impl MockToken {
    pub fn new(asset: AssetId) -> Self {
        Self {
            asset,
            balances: Mutex::new(Balances::default()),
            fail_transfers: AtomicBool::new(false),
        }
    }

    /// Credit a wallet out of thin air
    pub fn mint(&self, holder: &AccountId, amount: Amount) {
        let mut balances = self.balances.lock().unwrap();
        let wallet = balances.wallets.entry(holder.clone()).or_default();
        *wallet = wallet.checked_add(amount).unwrap_or(Amount::MAX);
    }

    /// Wallet balance of a participant
    pub fn balance_of(&self, holder: &AccountId) -> Amount {
        let balances = self.balances.lock().unwrap();
        balances.wallets.get(holder).copied().unwrap_or_default()
    }

    /// Make every following transfer fail (or succeed again)
    pub fn set_fail_transfers(&self, fail: bool) {
        self.fail_transfers.store(fail, Ordering::SeqCst);
    }

    fn check_enabled(&self) -> Result<(), TransferError> {
        if self.fail_transfers.load(Ordering::SeqCst) {
            tracing::debug!(asset = %self.asset, "Mock token rejecting transfer");
            return Err(TransferError::Rejected {
                asset: self.asset.to_string(),
                reason: "transfers disabled".to_string(),
            });
        }
        Ok(())
    }

    fn overflow(&self) -> TransferError {
        TransferError::Overflow {
            asset: self.asset.to_string(),
        }
    }
}

impl AssetTransfer for MockToken {
    fn asset(&self) -> &AssetId {
        &self.asset
    }

    fn transfer_in(&self, from: &AccountId, amount: Amount) -> Result<(), TransferError> {
        self.check_enabled()?;
        let mut balances = self.balances.lock().unwrap();

        let available = balances.wallets.get(from).copied().unwrap_or_default();
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| TransferError::InsufficientBalance {
                asset: self.asset.to_string(),
                holder: from.to_string(),
                available,
                required: amount,
            })?;
        let custody = balances
            .custody
            .checked_add(amount)
            .ok_or_else(|| self.overflow())?;

        balances.wallets.insert(from.clone(), remaining);
        balances.custody = custody;
        Ok(())
    }

    fn transfer_out(&self, to: &AccountId, amount: Amount) -> Result<(), TransferError> {
        self.check_enabled()?;
        let mut balances = self.balances.lock().unwrap();

        let custody = balances
            .custody
            .checked_sub(amount)
            .ok_or_else(|| TransferError::InsufficientBalance {
                asset: self.asset.to_string(),
                holder: "custody".to_string(),
                available: balances.custody,
                required: amount,
            })?;
        let wallet = balances.wallets.get(to).copied().unwrap_or_default();
        let credited = wallet.checked_add(amount).ok_or_else(|| self.overflow())?;

        balances.custody = custody;
        balances.wallets.insert(to.clone(), credited);
        Ok(())
    }

    fn custody_balance(&self) -> Amount {
        self.balances.lock().unwrap().custody
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdc() -> MockToken {
        MockToken::new("USDC".parse().unwrap())
    }

    fn alice() -> AccountId {
        "alice".parse().unwrap()
    }

    #[test]
    fn test_transfer_in_moves_to_custody() {
        let token = usdc();
        token.mint(&alice(), Amount::new(100));

        token.transfer_in(&alice(), Amount::new(60)).unwrap();

        assert_eq!(token.balance_of(&alice()), Amount::new(40));
        assert_eq!(token.custody_balance(), Amount::new(60));
    }

    #[test]
    fn test_transfer_in_insufficient_wallet() {
        let token = usdc();
        token.mint(&alice(), Amount::new(10));

        let result = token.transfer_in(&alice(), Amount::new(11));
        assert!(matches!(result, Err(TransferError::InsufficientBalance { .. })));
        assert_eq!(token.balance_of(&alice()), Amount::new(10));
        assert_eq!(token.custody_balance(), Amount::ZERO);
    }

    #[test]
    fn test_transfer_out_limited_by_custody() {
        let token = usdc();
        let result = token.transfer_out(&alice(), Amount::new(1));
        assert!(matches!(result, Err(TransferError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_round_trip() {
        let token = usdc();
        token.mint(&alice(), Amount::new(100));
        token.transfer_in(&alice(), Amount::new(100)).unwrap();
        token.transfer_out(&alice(), Amount::new(100)).unwrap();
        assert_eq!(token.balance_of(&alice()), Amount::new(100));
        assert_eq!(token.custody_balance(), Amount::ZERO);
    }

    #[test]
    fn test_failure_injection() {
        let token = usdc();
        token.mint(&alice(), Amount::new(100));
        token.set_fail_transfers(true);

        let result = token.transfer_in(&alice(), Amount::new(1));
        assert!(matches!(result, Err(TransferError::Rejected { .. })));
        assert_eq!(token.balance_of(&alice()), Amount::new(100));

        token.set_fail_transfers(false);
        assert!(token.transfer_in(&alice(), Amount::new(1)).is_ok());
    }
}
