//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! The private key is deliberately absent: the wallet reads it from the
//! environment and it never lives in this struct.

use serde::{Deserialize, Serialize};

/// Root configuration for a bank run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BankConfig {
    /// RPC endpoint and receipt wait policy.
    pub chain: ChainConfig,

    /// Deployed ledger contract.
    pub contract: ContractConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL (http, https, ws or wss).
    pub rpc_url: String,

    /// Expected chain ID. Checked at startup when set.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a receipt in seconds.
    pub receipt_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Blocks required counting the inclusion block.
    pub confirmation_blocks: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: None,
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 300,
            poll_interval_ms: 2000,
            confirmation_blocks: 1,
        }
    }
}

/// Ledger contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the deployed ledger contract.
    pub address: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
