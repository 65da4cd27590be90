//! Startup: build the run context once, in dependency order.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Signer first, then connection, then the contract proxy

use alloy::primitives::Address;

use crate::blockchain::{ChainClient, Wallet};
use crate::config::BankConfig;
use crate::error::{BankError, BankResult};
use crate::ledger::LedgerContractProxy;

/// Everything a run needs, constructed at process start and passed in.
#[derive(Debug)]
pub struct AppContext {
    pub config: BankConfig,
    pub ledger: LedgerContractProxy,
}

impl AppContext {
    /// Load the signer from the environment and connect.
    pub async fn build(config: BankConfig) -> BankResult<Self> {
        let wallet = Wallet::from_env()?;
        Self::with_wallet(config, &wallet).await
    }

    /// Connect with an already loaded signer.
    pub async fn with_wallet(config: BankConfig, wallet: &Wallet) -> BankResult<Self> {
        let contract: Address = config
            .contract
            .address
            .parse()
            .map_err(|e| BankError::Config(format!("Invalid contract address: {}", e)))?;

        let client = ChainClient::connect(config.chain.clone(), wallet).await?;
        let ledger = LedgerContractProxy::new(client, contract);

        tracing::info!(
            rpc_url = %config.chain.rpc_url,
            signer = %wallet.address(),
            contract = %contract,
            "Setup complete"
        );

        Ok(Self { config, ledger })
    }
}
