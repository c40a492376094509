//! Owner-gated parameter updates
//!
//! Each update re-validates the whole parameter set before it lands.
//! Rates change prospectively: positions accrue at the rate in force when
//! they are next touched.

use lendpool_core::{AccountId, ParamsError, PoolParams};

use crate::error::LendingError;
use crate::event::LendingEvent;
use crate::ledger::Ledger;

impl Ledger {
    /// Set the annual borrow rate (1e18 scale)
    pub fn update_borrow_rate(&mut self, caller: &AccountId, rate: u128) -> Result<(), LendingError> {
        self.update_params(caller, "update_borrow_rate", |p| p.with_borrow_rate(rate))
    }

    /// Set the annual supply rate (1e18 scale); must stay below the borrow rate
    pub fn update_supply_rate(&mut self, caller: &AccountId, rate: u128) -> Result<(), LendingError> {
        self.update_params(caller, "update_supply_rate", |p| p.with_supply_rate(rate))
    }

    /// Set the max LTV in basis points; must stay below the threshold
    pub fn update_max_ltv(&mut self, caller: &AccountId, max_ltv_bps: u128) -> Result<(), LendingError> {
        self.update_params(caller, "update_max_ltv", |p| p.with_max_ltv(max_ltv_bps))
    }

    /// Set the liquidation threshold in basis points
    pub fn update_liquidation_threshold(
        &mut self,
        caller: &AccountId,
        threshold_bps: u128,
    ) -> Result<(), LendingError> {
        self.update_params(caller, "update_liquidation_threshold", |p| {
            p.with_liquidation_threshold(threshold_bps)
        })
    }

    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    fn update_params<F>(&mut self, caller: &AccountId, op: &'static str, change: F) -> Result<(), LendingError>
    where
        F: FnOnce(PoolParams) -> Result<PoolParams, ParamsError>,
    {
        let now = self.clock.now();
        let checkpoint = self.checkpoint(&[]);
        let result = self.apply_params(caller, change);
        self.finish(op, checkpoint, now, result)
    }

    fn apply_params<F>(&mut self, caller: &AccountId, change: F) -> Result<(), LendingError>
    where
        F: FnOnce(PoolParams) -> Result<PoolParams, ParamsError>,
    {
        if caller != &self.admin {
            return Err(LendingError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        let params = change(self.pool.params)?;
        self.set_params(params);
        self.emit(LendingEvent::ParametersUpdated { params });

        tracing::info!(
            max_ltv_bps = params.max_ltv_bps,
            liquidation_threshold_bps = params.liquidation_threshold_bps,
            borrow_rate = params.borrow_rate,
            supply_rate = params.supply_rate,
            "Pool parameters updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::event::MemorySink;
    use crate::ledger::LedgerDeps;
    use lendpool_core::ManualClock;
    use lendpool_custody::MockToken;
    use lendpool_oracle::MockOracle;
    use std::sync::Arc;

    fn id(name: &str) -> AccountId {
        name.parse().unwrap()
    }

    fn ledger() -> (Ledger, Arc<MemorySink>) {
        let config = PoolConfig::new(id("admin"), "USDC".parse().unwrap(), "WETH".parse().unwrap());
        let sink = Arc::new(MemorySink::new());
        let ledger = Ledger::new(
            &config,
            LedgerDeps {
                oracle: Arc::new(MockOracle::new(8)),
                asset_token: Arc::new(MockToken::new("USDC".parse().unwrap())),
                collateral_token: Arc::new(MockToken::new("WETH".parse().unwrap())),
                clock: Arc::new(ManualClock::new(1)),
            },
        )
        .unwrap()
        .with_sink(sink.clone());
        (ledger, sink)
    }

    #[test]
    fn test_non_admin_rejected() {
        let (mut ledger, sink) = ledger();
        let before = ledger.pool.params;

        let result = ledger.update_borrow_rate(&id("mallory"), 1);

        assert_eq!(
            result,
            Err(LendingError::Unauthorized {
                caller: "mallory".to_string()
            })
        );
        assert_eq!(ledger.pool.params, before);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_admin_updates_emit_event() {
        let (mut ledger, sink) = ledger();
        let admin = id("admin");

        ledger.update_max_ltv(&admin, 7_000).unwrap();
        ledger.update_liquidation_threshold(&admin, 8_500).unwrap();

        assert_eq!(ledger.pool.params.max_ltv_bps, 7_000);
        assert_eq!(ledger.pool.params.liquidation_threshold_bps, 8_500);
        let events = sink.take();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            LendingEvent::ParametersUpdated {
                params: ledger.pool.params
            }
        );
    }

    #[test]
    fn test_cross_invariants_enforced() {
        let (mut ledger, _) = ledger();
        let admin = id("admin");
        let borrow_rate = ledger.pool.params.borrow_rate;

        assert!(matches!(
            ledger.update_supply_rate(&admin, borrow_rate),
            Err(LendingError::InvalidParameters(_))
        ));
        assert!(matches!(
            ledger.update_max_ltv(&admin, 8_000),
            Err(LendingError::InvalidParameters(_))
        ));
        assert!(matches!(
            ledger.update_liquidation_threshold(&admin, 10_001),
            Err(LendingError::InvalidParameters(_))
        ));
        ledger.update_borrow_rate(&admin, borrow_rate * 2).unwrap();
        assert_eq!(ledger.pool.params.borrow_rate, borrow_rate * 2);
    }
}
