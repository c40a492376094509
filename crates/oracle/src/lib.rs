//! Lendpool Price Oracle
//!
//! Provides the collateral price feed consumed by the risk engine.
//! `MockOracle` is a settable in-memory feed for tests and simulations.

mod error;
mod mock;
mod types;

pub use error::OracleError;
pub use mock::MockOracle;
pub use types::{OraclePrice, PriceOracle};
