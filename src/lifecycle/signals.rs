//! OS signal handling.

use crate::error::BankError;

/// Resolve when the operator interrupts the process.
///
/// A transaction already broadcast is not cancelled by this; the run simply
/// stops issuing further calls.
pub async fn interrupted() -> BankError {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
        // Never resolve if the handler cannot be installed.
        std::future::pending::<()>().await;
    }
    tracing::warn!("Interrupted by operator");
    BankError::UserAbort
}
