//! Transaction orchestration.
//!
//! # Data Flow
//! ```text
//! Idle → overview (network, native balance, nonce)
//!     → ValidatingDeposit → ConfirmingDeposit → SubmittingDeposit
//!     → AwaitingDepositReceipt → CheckingBalance1 → CheckingTotal1
//!     → ValidatingWithdraw → ConfirmingWithdraw → SubmittingWithdraw
//!     → AwaitingWithdrawReceipt → CheckingBalance2 → CheckingTotal2
//!     → Done
//!
//! any step error → Aborted (no retries, no rollback)
//! ```
//!
//! # Design Decisions
//! - Explicit state machine driven by a single control loop
//! - Withdraw is only reachable through a confirmed deposit receipt
//! - Balances are read only after the preceding receipt is observed
//! - The ledger contract is authoritative; mismatches are reported, not fixed

pub mod machine;
pub mod report;
pub mod state;

pub use machine::TransactionOrchestrator;
pub use report::{Reconciliation, RunReport, StepFailure};
pub use state::RunState;
