//! Core oracle types

use chrono::{DateTime, Utc};
use lendpool_core::AssetId;
use serde::{Deserialize, Serialize};

use crate::OracleError;

/// A price answer with metadata.
///
/// `answer` is signed the way aggregator feeds report it; only strictly
/// positive answers are usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OraclePrice {
    /// Asset being priced
    pub asset: AssetId,
    /// Raw answer, scaled by `10^decimals`
    pub answer: i128,
    /// When the answer was produced
    pub timestamp: DateTime<Utc>,
    /// Source of the price (e.g., "mock", "chainlink")
    pub source: String,
}

impl OraclePrice {
    pub fn new(asset: AssetId, answer: i128, source: impl Into<String>) -> Self {
        Self {
            asset,
            answer,
            timestamp: Utc::now(),
            source: source.into(),
        }
    }

    /// The answer as an unsigned price, rejecting zero and negative values
    pub fn positive_answer(&self) -> Result<u128, OracleError> {
        if self.answer <= 0 {
            return Err(OracleError::InvalidPrice {
                asset: self.asset.to_string(),
                reason: format!("non-positive answer {}", self.answer),
            });
        }
        Ok(self.answer as u128)
    }
}

/// Price Oracle trait - interface for price feeds
///
/// Implementations can be:
/// - MockOracle: settable prices for tests and simulations
/// - an aggregator adapter reading an external feed
pub trait PriceOracle: Send + Sync {
    /// Latest price for an asset
    fn get_price(&self, asset: &AssetId) -> Result<OraclePrice, OracleError>;

    /// Decimal scale of every answer from this feed
    fn decimals(&self) -> u8;
}
