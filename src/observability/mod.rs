//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (step, tx_hash, amount, signer)
//!     → logging.rs (EnvFilter + fmt layer on stderr)
//! ```
//!
//! # Design Decisions
//! - Private keys never reach a log line
//! - Operator-facing text goes through the Operator, not the logger

pub mod logging;

pub use logging::init_logging;
