//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Writes to stderr so operator output on stdout stays readable
//! - `RUST_LOG` wins over the configured level

use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(level: &str) -> String {
    format!("secure_bank={}", level)
}

/// Colour only when a terminal reads the output and `NO_COLOR` is unset.
fn use_ansi(is_terminal: bool) -> bool {
    is_terminal && std::env::var_os("NO_COLOR").is_none()
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_ansi(std::io::stderr().is_terminal())),
        )
        .try_init();
}
