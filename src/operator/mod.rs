//! Operator interaction.
//!
//! The orchestrator never touches stdin/stdout directly; it asks an
//! [`Operator`] for amounts and confirmations and hands it status lines.

pub mod terminal;

use async_trait::async_trait;

use crate::error::BankResult;

pub use terminal::TerminalOperator;

/// Source of amounts and confirmations, sink for status output.
#[async_trait]
pub trait Operator: Send {
    /// Ask a free-form question. The answer comes back without its line terminator.
    async fn ask(&mut self, question: &str) -> BankResult<String>;

    /// Block until the operator lets the run continue.
    ///
    /// Fails with `UserAbort` when the operator declines.
    async fn confirm(&mut self, question: &str) -> BankResult<()>;

    /// Show one line of progress.
    fn status(&mut self, line: &str);
}

/// Answers that decline a confirmation gate.
pub fn is_decline(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "n" | "no" | "q" | "quit"
    )
}
