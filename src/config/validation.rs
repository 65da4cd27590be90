//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URL scheme, contract address, value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BankConfig → Result<(), Vec<ValidationError>>

use alloy::primitives::Address;
use std::fmt;

use crate::config::schema::BankConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const RPC_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

/// Check a loaded configuration.
pub fn validate_config(config: &BankConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.chain.rpc_url) {
        Ok(url) if !RPC_SCHEMES.contains(&url.scheme()) => {
            errors.push(ValidationError::new(
                "chain.rpc_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("chain.rpc_url", e.to_string())),
    }

    if config.contract.address.is_empty() {
        errors.push(ValidationError::new("contract.address", "missing"));
    } else {
        match config.contract.address.parse::<Address>() {
            Ok(address) if address.is_zero() => {
                errors.push(ValidationError::new("contract.address", "zero address"));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::new("contract.address", e.to_string())),
        }
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be > 0"));
    }
    if config.chain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.receipt_timeout_secs", "must be > 0"));
    }
    if config.chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("chain.poll_interval_ms", "must be > 0"));
    } else if config.chain.poll_interval_ms >= config.chain.receipt_timeout_secs.saturating_mul(1000) {
        errors.push(ValidationError::new(
            "chain.poll_interval_ms",
            "must be shorter than the receipt timeout",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
