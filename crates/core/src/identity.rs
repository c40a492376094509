//! Identities - Type-safe participant and asset identifiers
//!
//! Raw strings are validated once at the boundary and carried as
//! `AccountId` / `AssetId` everywhere else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Empty identifier")]
    Empty,

    #[error("Identifier too long (max {max} chars): {value}")]
    TooLong { value: String, max: usize },

    #[error("Invalid identifier format: {0}")]
    InvalidFormat(String),
}

const MAX_ACCOUNT_LEN: usize = 64;
const MAX_ASSET_LEN: usize = 10;

/// Participant identity (supplier, borrower, liquidator, admin).
///
/// # Examples
/// ```
/// use lendpool_core::AccountId;
///
/// let alice: AccountId = "alice".parse().unwrap();
/// assert_eq!(alice.as_str(), "alice");
/// assert!("".parse::<AccountId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(IdentityError::Empty);
        }

        if s.len() > MAX_ACCOUNT_LEN {
            return Err(IdentityError::TooLong {
                value: s.to_string(),
                max: MAX_ACCOUNT_LEN,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(IdentityError::InvalidFormat(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdentityError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

/// Asset/token code, upper-cased (e.g. `USDC`, `WETH`).
///
/// # Examples
/// ```
/// use lendpool_core::AssetId;
///
/// let weth: AssetId = "weth".parse().unwrap();
/// assert_eq!(weth.to_string(), "WETH");
/// assert!("W-ETH".parse::<AssetId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl FromStr for AssetId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();

        if s.is_empty() {
            return Err(IdentityError::Empty);
        }

        if s.len() > MAX_ASSET_LEN {
            return Err(IdentityError::TooLong {
                value: s,
                max: MAX_ASSET_LEN,
            });
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(IdentityError::InvalidFormat(s));
        }

        Ok(Self(s))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AssetId {
    type Error = IdentityError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}
