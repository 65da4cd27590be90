//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Load signer → Connect → Build ledger proxy
//!
//! Signals (signals.rs):
//!     SIGINT → drop the run at its current suspension point
//! ```

pub mod signals;
pub mod startup;

pub use startup::AppContext;
