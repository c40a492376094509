//! Lendpool Ledger - Single-collateral lending pool
//!
//! The `Ledger` owns the pool totals and every account record. It drives:
//! - interest accrual on supply and borrow positions
//! - borrow-limit and health checks through the risk engine
//! - liquidation of unhealthy positions with a collateral bonus
//! - token movement through injected custody adapters
//!
//! Operations are all-or-nothing. `SharedLedger` serializes concurrent
//! callers behind one async lock.

mod admin;
pub mod config;
pub mod error;
pub mod event;
mod ledger;
pub mod liquidation;
pub mod query;
mod shared;
pub mod state;

pub use config::{ConfigError, PoolConfig};
pub use error::LendingError;
pub use event::{EventSink, LendingEvent, MemorySink, SinkError};
pub use ledger::{Ledger, LedgerDeps};
pub use liquidation::{LiquidationEngine, LiquidationResult, Seizure};
pub use query::{AccountSnapshot, Health, PositionStatus, SupplyBalance};
pub use shared::SharedLedger;
pub use state::{Account, Pool};
