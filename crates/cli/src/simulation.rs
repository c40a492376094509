//! Scripted pool simulation over mock collaborators

use lendpool_core::{AccountId, AssetId, ManualClock};
use lendpool_custody::{AssetTransfer, MockToken};
use lendpool_events::JournalSink;
use lendpool_ledger::config::apr_to_rate;
use lendpool_ledger::{
    AccountSnapshot, Ledger, LedgerDeps, LendingError, Pool, PoolConfig, SharedLedger,
};
use lendpool_oracle::MockOracle;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::script::{format_units, to_answer, to_base_units, Script, Step, Token};

/// Result of one script step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub step: &'static str,
    /// Human-readable result
    pub detail: String,
    /// Ledger rejection, if any
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Final state after the last step
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub ledger_time: u64,
    pub pool: Pool,
    pub utilization_bps: u128,
    pub accounts: Vec<AccountSnapshot>,
    pub outcomes: Vec<StepOutcome>,
}

impl SimulationReport {
    pub fn rejected(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }
}

/// A ledger plus the mock world around it
pub struct Simulation {
    ledger: SharedLedger,
    oracle: Arc<MockOracle>,
    borrow_token: Arc<MockToken>,
    collateral_token: Arc<MockToken>,
    clock: Arc<ManualClock>,
    collateral_asset: AssetId,
    token_decimals: u8,
    oracle_decimals: u8,
}

impl Simulation {
    pub fn new(config: &PoolConfig, script: &Script, journal: Option<&Path>) -> anyhow::Result<Self> {
        let oracle = Arc::new(MockOracle::new(script.oracle_decimals));
        oracle.set_price(
            config.collateral_asset.clone(),
            to_answer(script.initial_price, script.oracle_decimals)?,
        );
        let borrow_token = Arc::new(MockToken::new(config.borrow_asset.clone()));
        let collateral_token = Arc::new(MockToken::new(config.collateral_asset.clone()));
        let clock = Arc::new(ManualClock::new(script.start_time));

        let mut ledger = Ledger::new(
            config,
            LedgerDeps {
                oracle: oracle.clone(),
                asset_token: borrow_token.clone(),
                collateral_token: collateral_token.clone(),
                clock: clock.clone(),
            },
        )?;
        if let Some(path) = journal {
            ledger.add_sink(Arc::new(JournalSink::open(path)?));
        }

        Ok(Self {
            ledger: SharedLedger::new(ledger),
            oracle,
            borrow_token,
            collateral_token,
            clock,
            collateral_asset: config.collateral_asset.clone(),
            token_decimals: script.token_decimals,
            oracle_decimals: script.oracle_decimals,
        })
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Run every step; ledger rejections are recorded, malformed steps abort
    pub async fn run(&self, steps: &[Step]) -> anyhow::Result<Vec<StepOutcome>> {
        let mut outcomes = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            let outcome = match self.apply(step).await? {
                Ok(detail) => StepOutcome {
                    index,
                    step: step.name(),
                    detail,
                    error: None,
                },
                Err(err) => StepOutcome {
                    index,
                    step: step.name(),
                    detail: format!("rejected: {}", err),
                    error: Some(format!("{:?}", err)),
                },
            };
            tracing::debug!(index, step = outcome.step, ok = outcome.is_ok(), "Step applied");
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn apply(&self, step: &Step) -> anyhow::Result<Result<String, LendingError>> {
        let units = |value| to_base_units(value, self.token_decimals);
        let show = |amount| format_units(amount, self.token_decimals);
        let ledger = &self.ledger;

        let result = match step {
            Step::Mint {
                token,
                account,
                amount,
            } => {
                let amount = units(*amount)?;
                self.token(*token).mint(account, amount);
                Ok(format!("{} received {}", account, show(amount)))
            }
            Step::SetPrice { price } => {
                self.oracle.set_price(
                    self.collateral_asset.clone(),
                    to_answer(*price, self.oracle_decimals)?,
                );
                Ok(format!("{} price set to {}", self.collateral_asset, price))
            }
            Step::Advance { days, seconds } => {
                let total = days
                    .checked_mul(86_400)
                    .and_then(|d| d.checked_add(*seconds))
                    .ok_or_else(|| anyhow::anyhow!("advance out of range"))?;
                self.clock.advance(total);
                Ok(format!("clock advanced {}s", total))
            }
            Step::Supply { account, amount } => {
                let amount = units(*amount)?;
                ledger
                    .supply(account, amount)
                    .await
                    .map(|_| format!("{} supplied {}", account, show(amount)))
            }
            Step::WithdrawSupply { account, amount } => {
                let amount = units(*amount)?;
                ledger
                    .withdraw_supply(account, amount)
                    .await
                    .map(|_| format!("{} withdrew {}", account, show(amount)))
            }
            Step::ClaimInterest { account } => ledger
                .claim_supply_interest(account)
                .await
                .map(|interest| format!("{} claimed {}", account, show(interest))),
            Step::DepositCollateral { account, amount } => {
                let amount = units(*amount)?;
                ledger
                    .deposit_collateral(account, amount)
                    .await
                    .map(|_| format!("{} pledged {}", account, show(amount)))
            }
            Step::WithdrawCollateral { account, amount } => {
                let amount = units(*amount)?;
                ledger
                    .withdraw_collateral(account, amount)
                    .await
                    .map(|_| format!("{} released {}", account, show(amount)))
            }
            Step::Borrow { account, amount } => {
                let amount = units(*amount)?;
                ledger
                    .borrow(account, amount)
                    .await
                    .map(|_| format!("{} borrowed {}", account, show(amount)))
            }
            Step::Repay { account, amount } => {
                let amount = units(*amount)?;
                ledger
                    .repay(account, amount)
                    .await
                    .map(|repaid| format!("{} repaid {}", account, show(repaid)))
            }
            Step::Liquidate {
                liquidator,
                borrower,
                amount,
            } => {
                let amount = units(*amount)?;
                ledger
                    .liquidate(liquidator, borrower, amount)
                    .await
                    .map(|r| {
                        format!(
                            "{} covered {} of {}'s debt, seized {}{}",
                            liquidator,
                            show(r.debt_covered),
                            borrower,
                            show(r.collateral_seized),
                            if r.capped { " (capped)" } else { "" }
                        )
                    })
            }
            Step::UpdateBorrowRate { caller, apr } => {
                let rate = apr_to_rate(*apr)?;
                ledger
                    .update_borrow_rate(caller, rate)
                    .await
                    .map(|_| format!("borrow APR set to {}", apr))
            }
            Step::UpdateSupplyRate { caller, apr } => {
                let rate = apr_to_rate(*apr)?;
                ledger
                    .update_supply_rate(caller, rate)
                    .await
                    .map(|_| format!("supply APR set to {}", apr))
            }
            Step::UpdateMaxLtv { caller, bps } => ledger
                .update_max_ltv(caller, *bps as u128)
                .await
                .map(|_| format!("max LTV set to {} bp", bps)),
            Step::UpdateLiquidationThreshold { caller, bps } => ledger
                .update_liquidation_threshold(caller, *bps as u128)
                .await
                .map(|_| format!("liquidation threshold set to {} bp", bps)),
            Step::Inspect { account } => ledger
                .account_snapshot(account)
                .await
                .map(|s| self.describe(&s)),
        };
        Ok(result)
    }

    fn token(&self, token: Token) -> &MockToken {
        match token {
            Token::Borrow => &self.borrow_token,
            Token::Collateral => &self.collateral_token,
        }
    }

    /// Wallet balance on one of the mock tokens
    pub fn wallet(&self, token: Token, account: &AccountId) -> lendpool_core::Amount {
        self.token(token).balance_of(account)
    }

    fn describe(&self, s: &AccountSnapshot) -> String {
        let show = |amount| format_units(amount, self.token_decimals);
        let health = if s.health_factor == u128::MAX {
            "inf".to_string()
        } else {
            format!("{}.{:04}", s.health_factor / 10_000, s.health_factor % 10_000)
        };
        format!(
            "{}: supplied {} (+{} interest), collateral {}, debt {}, health {}, status {:?}",
            s.account,
            show(s.supply.principal),
            show(s.supply.interest),
            show(s.collateral),
            show(s.debt),
            health,
            s.status
        )
    }

    /// Snapshot of the pool and every account
    pub async fn report(&self, outcomes: Vec<StepOutcome>) -> anyhow::Result<SimulationReport> {
        let ledger = self.ledger.lock().await;
        let mut accounts = Vec::new();
        for (id, _) in ledger.accounts() {
            accounts.push(ledger.account_snapshot(id)?);
        }
        tracing::info!(
            custody = %self.borrow_token.custody_balance(),
            accounts = accounts.len(),
            "Simulation finished"
        );
        Ok(SimulationReport {
            ledger_time: ledger.now(),
            pool: ledger.pool().clone(),
            utilization_bps: ledger.utilization_bps()?,
            accounts,
            outcomes,
        })
    }
}
