//! Ledger contract subsystem.
//!
//! # Data Flow
//! ```text
//! operator input
//!     → amount.rs (parse & validate)
//!     → proxy.rs (typed deposit / withdraw / balances / getBalance)
//!     → abi.rs (calldata & return decoding)
//!     → ChainClient (eth_call, broadcast, receipt)
//!     → types.rs (snapshots, events decoded from receipt logs)
//! ```

pub mod abi;
pub mod amount;
pub mod proxy;
pub mod types;

pub use amount::Amount;
pub use proxy::{Ledger, LedgerContractProxy};
pub use types::{AccountSnapshot, LedgerEvent};
