//! Shared fixture for ledger integration tests

#![allow(dead_code)]

use std::sync::Arc;

use lendpool_core::math::RATE_PRECISION;
use lendpool_core::{AccountId, Amount, AssetId, ManualClock};
use lendpool_custody::MockToken;
use lendpool_ledger::{Ledger, LedgerDeps, MemorySink, PoolConfig};
use lendpool_oracle::MockOracle;

pub const WAD: u128 = RATE_PRECISION;
pub const DAY: u64 = 86_400;
pub const YEAR: u64 = 365 * DAY;
pub const START: u64 = 1_700_000_000;

/// Price with 8 decimals
pub fn usd(price: i128) -> i128 {
    price * 100_000_000
}

pub fn tokens(n: u128) -> Amount {
    Amount::new(n * WAD)
}

pub fn id(name: &str) -> AccountId {
    name.parse().unwrap()
}

pub fn usdc_id() -> AssetId {
    "USDC".parse().unwrap()
}

pub fn weth_id() -> AssetId {
    "WETH".parse().unwrap()
}

/// Ledger wired to mock collaborators, WETH at 2000
pub struct Harness {
    pub ledger: Ledger,
    pub oracle: Arc<MockOracle>,
    pub usdc: Arc<MockToken>,
    pub weth: Arc<MockToken>,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<MemorySink>,
}

impl Harness {
    pub fn new() -> Self {
        let oracle = Arc::new(MockOracle::new(8));
        oracle.set_price(weth_id(), usd(2_000));
        let usdc = Arc::new(MockToken::new(usdc_id()));
        let weth = Arc::new(MockToken::new(weth_id()));
        let clock = Arc::new(ManualClock::new(START));
        let sink = Arc::new(MemorySink::new());

        let config = PoolConfig::new(id("admin"), usdc_id(), weth_id());
        let ledger = Ledger::new(
            &config,
            LedgerDeps {
                oracle: oracle.clone(),
                asset_token: usdc.clone(),
                collateral_token: weth.clone(),
                clock: clock.clone(),
            },
        )
        .unwrap()
        .with_sink(sink.clone());

        Self {
            ledger,
            oracle,
            usdc,
            weth,
            clock,
            sink,
        }
    }

    /// Mint and supply the borrow asset
    pub fn fund_pool(&mut self, supplier: &AccountId, amount: Amount) {
        self.usdc.mint(supplier, amount);
        self.ledger.supply(supplier, amount).unwrap();
    }

    /// Mint and pledge collateral
    pub fn pledge(&mut self, account: &AccountId, amount: Amount) {
        self.weth.mint(account, amount);
        self.ledger.deposit_collateral(account, amount).unwrap();
    }

    /// Pool totals must equal the per-account sums and custody
    pub fn assert_totals(&self) {
        let pool = self.ledger.pool();
        let mut supplied = 0u128;
        let mut borrowed = 0u128;
        let mut collateral = 0u128;
        for (_, account) in self.ledger.accounts() {
            supplied += account.supply.principal.value();
            borrowed += account.borrow.principal.value();
            collateral += account.collateral.value();
        }
        assert_eq!(pool.total_supplied.value(), supplied, "supplied drift");
        assert_eq!(pool.total_borrowed.value(), borrowed, "borrowed drift");
        assert_eq!(pool.total_collateral.value(), collateral, "collateral drift");
        assert_eq!(
            lendpool_custody::AssetTransfer::custody_balance(self.weth.as_ref()),
            pool.total_collateral,
            "collateral custody drift"
        );
    }
}
