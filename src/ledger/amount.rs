//! Monetary amounts in the chain's smallest unit (wei).

use alloy::primitives::utils::format_ether;
use alloy::primitives::U256;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{BankError, BankResult};

/// Non-negative integer amount of wei.
///
/// Values read from the chain may be zero; values accepted from the operator
/// through [`Amount::parse`] are always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Amount = Amount(U256::ZERO);

    /// Parse operator input.
    ///
    /// Accepts a non-empty run of ASCII digits whose value is greater than zero
    /// and fits a uint256. Signs, whitespace, separators, fractions and hex
    /// prefixes are rejected.
    pub fn parse(raw: &str) -> BankResult<Self> {
        if raw.is_empty() {
            return Err(BankError::invalid_amount(raw, "empty input"));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BankError::invalid_amount(raw, "not a base-10 integer"));
        }

        let value = U256::from_str_radix(raw, 10)
            .map_err(|_| BankError::invalid_amount(raw, "exceeds uint256"))?;
        if value.is_zero() {
            return Err(BankError::invalid_amount(raw, "must be greater than zero"));
        }

        Ok(Self(value))
    }

    /// Wrap a value observed on chain.
    pub fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    pub fn wei(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Decimal ether rendering, e.g. `1.000000000000000000`.
    pub fn to_ether(&self) -> String {
        format_ether(self.0)
    }
}

impl From<u64> for Amount {
    fn from(wei: u64) -> Self {
        Self(U256::from(wei))
    }
}

impl FromStr for Amount {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Decimal string so large values survive JSON consumers.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}
