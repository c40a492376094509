//! Mock Oracle for testing
//!
//! Provides settable prices for deterministic risk calculations.

use lendpool_core::AssetId;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::OracleError;
use crate::types::{OraclePrice, PriceOracle};

/// Mock Price Oracle
///
/// Stores answers that can be updated programmatically. Answers are kept
/// exactly as set, including zero or negative ones, so callers can exercise
/// their invalid-price handling.
pub struct MockOracle {
    decimals: u8,
    /// Stored answers (asset -> price)
    prices: RwLock<HashMap<AssetId, OraclePrice>>,
}

impl MockOracle {
    /// Create a new empty mock oracle with the given answer scale
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals,
            prices: RwLock::new(HashMap::new()),
        }
    }

    /// Set the raw answer for an asset
    pub fn set_price(&self, asset: AssetId, answer: i128) {
        let price = OraclePrice::new(asset.clone(), answer, "mock");
        let mut prices = self.prices.write().unwrap();
        prices.insert(asset, price);
    }

    /// Remove a price (for testing missing feeds)
    pub fn remove_price(&self, asset: &AssetId) {
        let mut prices = self.prices.write().unwrap();
        prices.remove(asset);
    }

    /// Get number of configured assets
    pub fn asset_count(&self) -> usize {
        self.prices.read().unwrap().len()
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new(8)
    }
}

impl PriceOracle for MockOracle {
    fn get_price(&self, asset: &AssetId) -> Result<OraclePrice, OracleError> {
        let prices = self.prices.read().unwrap();
        prices
            .get(asset)
            .cloned()
            .ok_or_else(|| OracleError::AssetNotFound {
                asset: asset.to_string(),
            })
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }
}
