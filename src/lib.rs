//! Operator-driven deposit and withdrawal against a deployed ledger contract.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod observability;
pub mod operator;
pub mod orchestrator;

pub use config::BankConfig;
pub use error::{BankError, BankResult};
pub use ledger::{Amount, Ledger, LedgerContractProxy};
pub use orchestrator::{RunReport, RunState, TransactionOrchestrator};
