//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment (PRIVATE_KEY, RPC URL)
//!     → wallet.rs (key loading)
//!     → client.rs (RPC connection with timeouts, broadcast, receipt polling)
//!     → transaction.rs (pending → confirmed | reverted | timed-out)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
#[cfg(test)]
pub(crate) mod mock;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use transaction::{Operation, ReceiptPolicy, Transaction, TxStatus};
pub use types::{BlockchainError, ChainId, NetworkInfo};
pub use wallet::Wallet;
