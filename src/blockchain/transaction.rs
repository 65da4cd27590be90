//! Submitted transactions and the receipt wait policy.
//!
//! A [`Transaction`] is created `Pending` when broadcast and settles exactly once
//! into `Confirmed`, `Reverted` or `TimedOut`. It is never mutated afterwards.

use alloy::primitives::TxHash;
use alloy::rpc::types::Log;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::config::schema::ChainConfig;

/// The ledger operation a transaction represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Deposit,
    Withdraw,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Deposit => write!(f, "deposit"),
            Operation::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// Lifecycle status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Reverted,
    TimedOut,
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Pending => write!(f, "pending"),
            TxStatus::Confirmed => write!(f, "confirmed"),
            TxStatus::Reverted => write!(f, "reverted"),
            TxStatus::TimedOut => write!(f, "timed-out"),
        }
    }
}

/// A state-changing call broadcast by the signer.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub hash: TxHash,
    pub operation: Operation,
    pub status: TxStatus,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    /// Receipt logs, kept for event decoding.
    #[serde(skip)]
    pub logs: Vec<Log>,
}

impl Transaction {
    /// A freshly broadcast transaction.
    pub fn pending(hash: TxHash, operation: Operation) -> Self {
        Self {
            hash,
            operation,
            status: TxStatus::Pending,
            block_number: None,
            gas_used: None,
            logs: Vec::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TxStatus::Pending
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == TxStatus::Confirmed
    }

    /// Settle a pending transaction from its receipt.
    ///
    /// Already settled transactions are returned untouched.
    pub fn settle(mut self, success: bool, block_number: Option<u64>, gas_used: u64, logs: Vec<Log>) -> Self {
        if !self.is_pending() {
            return self;
        }
        self.status = if success { TxStatus::Confirmed } else { TxStatus::Reverted };
        self.block_number = block_number;
        self.gas_used = Some(gas_used);
        self.logs = logs;
        self
    }

    /// Mark a pending transaction as having no receipt within the wait policy.
    pub fn time_out(mut self) -> Self {
        if self.is_pending() {
            self.status = TxStatus::TimedOut;
        }
        self
    }
}

/// How long and how often to poll for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Blocks required counting the inclusion block (1 = included).
    pub confirmations: u32,
}

impl ReceiptPolicy {
    /// Number of confirmations a transaction included at `tx_block` has at `head`.
    pub fn confirmations_at(tx_block: u64, head: u64) -> u32 {
        if head < tx_block {
            return 0;
        }
        (head - tx_block + 1).min(u32::MAX as u64) as u32
    }
}

impl From<&ChainConfig> for ReceiptPolicy {
    fn from(config: &ChainConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.receipt_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            confirmations: config.confirmation_blocks.max(1),
        }
    }
}
