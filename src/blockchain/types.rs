//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use serde::Serialize;
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl ChainId {
    /// Well-known network name, `"unknown"` for anything else.
    pub fn name(&self) -> &'static str {
        match self.0 {
            1 => "mainnet",
            11155111 => "sepolia",
            17000 => "holesky",
            560048 => "hoodi",
            31337 => "anvil",
            _ => "unknown",
        }
    }
}

/// Network the client is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    pub name: String,
    pub chain_id: ChainId,
}

impl From<ChainId> for NetworkInfo {
    fn from(chain_id: ChainId) -> Self {
        Self {
            name: chain_id.name().to_string(),
            chain_id,
        }
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// No receipt was observed within the wait policy.
    #[error("Transaction {hash} has no receipt after {waited_secs} seconds")]
    ReceiptTimeout { hash: TxHash, waited_secs: u64 },

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Return data could not be decoded against the contract schema.
    #[error("ABI decode error: {0}")]
    Abi(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(11155111u64);
        assert_eq!(chain_id.0, 11155111);
        assert_eq!(u64::from(chain_id), 11155111);
    }

    #[test]
    fn test_network_names() {
        assert_eq!(NetworkInfo::from(ChainId(11155111)).name, "sepolia");
        assert_eq!(NetworkInfo::from(ChainId(1)).name, "mainnet");
        assert_eq!(NetworkInfo::from(ChainId(424242)).name, "unknown");
    }

    #[test]
    fn test_default_config() {
        let config = ChainConfig::default();
        assert_eq!(config.rpc_timeout_secs, 10);
        assert_eq!(config.receipt_timeout_secs, 300);
        assert_eq!(config.confirmation_blocks, 1);
        assert!(config.chain_id.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::ChainMismatch {
            expected: 11155111,
            actual: 1,
        };
        assert!(err.to_string().contains("11155111"));
    }
}
