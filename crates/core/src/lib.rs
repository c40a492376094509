//! Lendpool Core - Domain types
//!
//! This crate contains the fundamental types used across Lendpool:
//! - `Amount`: Unsigned base-unit token quantity
//! - `AccountId` / `AssetId`: Validated identities
//! - `math`: 256-bit multiply-then-divide fixed-point helpers
//! - `PoolParams`: Risk and rate parameters with their invariants
//! - `Clock`: Injected time source

pub mod amount;
pub mod clock;
pub mod identity;
pub mod math;
pub mod params;

pub use amount::{Amount, AmountError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use identity::{AccountId, AssetId, IdentityError};
pub use math::MathError;
pub use params::{ParamsError, PoolParams};
