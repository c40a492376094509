//! Lendpool Risk Engine
//!
//! Pure calculations the ledger runs before committing any change:
//! - `InterestAccrualEngine`: simple interest on supply and borrow positions
//! - `RiskEngine`: collateral value, health factor, borrow capacity
//!
//! Neither engine owns state. Positions are passed in by the ledger.

pub mod engine;
pub mod error;
pub mod interest;
pub mod position;

pub use engine::{CollateralPrice, RiskEngine};
pub use error::RiskError;
pub use interest::{Accrual, InterestAccrualEngine};
pub use position::{BorrowPosition, SupplyPosition};
