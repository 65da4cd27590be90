//! Configuration loading from disk and command-line overrides.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::BankConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Why a configuration could not be produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Values supplied out of band (environment or flags). `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub rpc_url: Option<String>,
    pub contract_address: Option<String>,
    pub chain_id: Option<u64>,
    pub receipt_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Apply every set override onto `config`.
    pub fn apply(&self, config: &mut BankConfig) {
        if let Some(url) = &self.rpc_url {
            config.chain.rpc_url = url.clone();
        }
        if let Some(address) = &self.contract_address {
            config.contract.address = address.clone();
        }
        if let Some(chain_id) = self.chain_id {
            config.chain.chain_id = Some(chain_id);
        }
        if let Some(secs) = self.receipt_timeout_secs {
            config.chain.receipt_timeout_secs = secs;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

/// Parse a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<BankConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build the run configuration: defaults, then the optional file, then overrides.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<BankConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => BankConfig::default(),
    };
    overrides.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
