//! Ledger events for observers
//!
//! Events are buffered while an operation runs and handed to the sinks
//! only after it commits. A rejected operation publishes nothing.

use lendpool_core::{AccountId, Amount, PoolParams};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Events emitted by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LendingEvent {
    Supplied {
        account: AccountId,
        amount: Amount,
    },

    /// Supply withdrawal or interest claim; `interest_portion` is the part
    /// paid from credited interest
    Withdrawn {
        account: AccountId,
        amount: Amount,
        interest_portion: Amount,
    },

    SupplyInterestAccrued {
        account: AccountId,
        interest: Amount,
    },

    CollateralDeposited {
        account: AccountId,
        amount: Amount,
    },

    CollateralWithdrawn {
        account: AccountId,
        amount: Amount,
    },

    Borrowed {
        account: AccountId,
        amount: Amount,
        total_debt: Amount,
    },

    Repaid {
        account: AccountId,
        amount: Amount,
        remaining_debt: Amount,
    },

    BorrowInterestAccrued {
        account: AccountId,
        interest: Amount,
    },

    Liquidated {
        borrower: AccountId,
        liquidator: AccountId,
        debt_covered: Amount,
        collateral_seized: Amount,
    },

    ParametersUpdated {
        params: PoolParams,
    },
}

impl LendingEvent {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            LendingEvent::Supplied { .. } => "supplied",
            LendingEvent::Withdrawn { .. } => "withdrawn",
            LendingEvent::SupplyInterestAccrued { .. } => "supply_interest_accrued",
            LendingEvent::CollateralDeposited { .. } => "collateral_deposited",
            LendingEvent::CollateralWithdrawn { .. } => "collateral_withdrawn",
            LendingEvent::Borrowed { .. } => "borrowed",
            LendingEvent::Repaid { .. } => "repaid",
            LendingEvent::BorrowInterestAccrued { .. } => "borrow_interest_accrued",
            LendingEvent::Liquidated { .. } => "liquidated",
            LendingEvent::ParametersUpdated { .. } => "parameters_updated",
        }
    }
}

/// Sink error, boxed so implementations keep their own error types
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Receiver of committed events.
///
/// `at` is the ledger time of the operation that produced the event.
/// Failures are logged by the ledger and never undo the operation.
pub trait EventSink: Send + Sync {
    fn publish(&self, at: u64, event: &LendingEvent) -> Result<(), SinkError>;
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<(u64, LendingEvent)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far
    pub fn events(&self) -> Vec<(u64, LendingEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// Drain the collected events
    pub fn take(&self) -> Vec<LendingEvent> {
        let mut events = self.events.lock().unwrap();
        events.drain(..).map(|(_, e)| e).collect()
    }
}

impl EventSink for MemorySink {
    fn publish(&self, at: u64, event: &LendingEvent) -> Result<(), SinkError> {
        self.events.lock().unwrap().push((at, event.clone()));
        Ok(())
    }
}
