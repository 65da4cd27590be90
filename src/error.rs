//! Error taxonomy for a deposit/withdraw run.
//!
//! Every failure the orchestrator can observe maps onto one of these variants.
//! None of them is retried; each one ends the run.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::types::BlockchainError;
use crate::blockchain::transaction::Operation;

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
pub enum BankError {
    /// User input is not a positive base-10 integer.
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// Transport failure talking to the RPC endpoint.
    #[error("RPC connection error: {0}")]
    RpcConnection(String),

    /// The contract rejected the call.
    #[error("{operation} transaction {hash} reverted")]
    TransactionReverted { operation: Operation, hash: TxHash },

    /// No receipt arrived within the wait policy.
    #[error("No receipt for transaction {hash} after {waited_secs} seconds")]
    TransactionTimeout { hash: TxHash, waited_secs: u64 },

    /// The operator declined a prompt.
    #[error("Aborted by operator")]
    UserAbort,

    /// Startup configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Signer could not be loaded.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

/// Result type for bank operations.
pub type BankResult<T> = Result<T, BankError>;

impl BankError {
    /// Shorthand for [`BankError::InvalidAmount`].
    pub fn invalid_amount(input: &str, reason: impl Into<String>) -> Self {
        BankError::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<BlockchainError> for BankError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::ReceiptTimeout { hash, waited_secs } => {
                BankError::TransactionTimeout { hash, waited_secs }
            }
            BlockchainError::Wallet(msg) => BankError::Wallet(msg),
            BlockchainError::ChainMismatch { .. } => BankError::Config(err.to_string()),
            other => BankError::RpcConnection(other.to_string()),
        }
    }
}
