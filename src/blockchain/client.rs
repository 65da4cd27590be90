//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to one JSON-RPC endpoint with the signer attached
//! - Query chain state (balances, nonce, network, receipts)
//! - Broadcast signed calls and wait for their receipts
//! - Bound every round-trip with a timeout

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::fmt::Display;
use std::future::IntoFuture;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::transaction::{Operation, ReceiptPolicy, Transaction};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainConfig, ChainId, NetworkInfo};
use crate::blockchain::wallet::Wallet;

/// Connection to the RPC endpoint bound to a single signer.
#[derive(Clone)]
pub struct ChainClient {
    provider: DynProvider,
    signer: Address,
    config: ChainConfig,
    timeout_duration: Duration,
    receipt_policy: ReceiptPolicy,
}

impl ChainClient {
    /// Connect to the configured endpoint and bind `wallet` as the signer.
    ///
    /// When the config names a chain id, the endpoint must report the same one.
    pub async fn connect(config: ChainConfig, wallet: &Wallet) -> BlockchainResult<Self> {
        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect(&config.rpc_url)
            .await
            .map_err(|e| BlockchainError::Rpc(format!("Cannot connect to '{}': {}", config.rpc_url, e)))?
            .erased();

        let client = Self::with_provider(provider, wallet.address(), config);

        if let Some(expected) = client.config.chain_id {
            client.verify_chain_id(expected).await?;
        }

        tracing::info!(
            rpc_url = %client.config.rpc_url,
            signer = %client.signer,
            "Chain client initialized"
        );

        Ok(client)
    }

    /// Wrap an already-built provider whose wallet signs for `signer`.
    ///
    /// No round-trip is made; the chain id is not checked.
    pub fn with_provider(provider: DynProvider, signer: Address, config: ChainConfig) -> Self {
        Self {
            provider,
            signer,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            receipt_policy: ReceiptPolicy::from(&config),
            config,
        }
    }

    /// Verify the connected chain ID matches `expected`.
    pub async fn verify_chain_id(&self, expected: u64) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Run one RPC round-trip under the client timeout.
    async fn rpc<T, E, F>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{} failed: {}", method, e)))
            }
            Err(_) => {
                tracing::warn!(method, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.rpc("eth_chainId", self.provider.get_chain_id()).await.map(ChainId)
    }

    /// Network name and chain id.
    pub async fn get_network_info(&self) -> BlockchainResult<NetworkInfo> {
        self.get_chain_id().await.map(NetworkInfo::from)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.rpc("eth_blockNumber", self.provider.get_block_number()).await
    }

    /// Native currency balance of an address, in wei.
    pub async fn get_native_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.rpc("eth_getBalance", self.provider.get_balance(address)).await
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.rpc("eth_getTransactionCount", self.provider.get_transaction_count(address)).await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<TransactionReceipt>> {
        self.rpc("eth_getTransactionReceipt", self.provider.get_transaction_receipt(tx_hash)).await
    }

    /// Execute a read-only call and return the raw return data.
    pub async fn call(&self, request: TransactionRequest) -> BlockchainResult<Bytes> {
        self.rpc("eth_call", self.provider.call(request.with_from(self.signer))).await
    }

    /// Sign and broadcast a call. Returns as soon as the node accepts it.
    ///
    /// Not idempotent: every invocation sends a new transaction.
    pub async fn submit(&self, request: TransactionRequest, operation: Operation) -> BlockchainResult<Transaction> {
        let pending = self
            .rpc("send_transaction", self.provider.send_transaction(request.with_from(self.signer)))
            .await?;
        let hash = *pending.tx_hash();

        tracing::info!(%operation, tx_hash = %hash, "Transaction broadcast");
        Ok(Transaction::pending(hash, operation))
    }

    /// Poll until the receipt of `tx_hash` is present with enough confirmations.
    ///
    /// Reverted receipts are returned as soon as they appear.
    async fn poll_receipt(&self, tx_hash: TxHash, policy: ReceiptPolicy) -> BlockchainResult<TransactionReceipt> {
        let mut ticker = interval(policy.poll_interval);

        loop {
            ticker.tick().await;

            let receipt = match self.get_transaction_receipt(tx_hash).await? {
                Some(r) => r,
                None => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    continue;
                }
            };

            if !receipt.status() || policy.confirmations <= 1 {
                return Ok(receipt);
            }

            let head = self.get_block_number().await?;
            let tx_block = receipt.block_number.unwrap_or(head);
            let confirmations = ReceiptPolicy::confirmations_at(tx_block, head);

            if confirmations >= policy.confirmations {
                return Ok(receipt);
            }

            tracing::debug!(
                tx_hash = %tx_hash,
                confirmations,
                required = policy.confirmations,
                "Waiting for confirmations"
            );
        }
    }

    /// Wait until `tx` is mined and settle its status from the receipt.
    ///
    /// Fails with [`BlockchainError::ReceiptTimeout`] when no receipt (or not
    /// enough confirmations) is observed within the receipt policy.
    pub async fn await_receipt(&self, tx: Transaction) -> BlockchainResult<Transaction> {
        let policy = self.receipt_policy;
        let tx_hash = tx.hash;

        let result = timeout(policy.timeout, self.poll_receipt(tx_hash, policy)).await;

        match result {
            Ok(Ok(receipt)) => {
                let settled = tx.settle(
                    receipt.status(),
                    receipt.block_number,
                    receipt.gas_used,
                    receipt.inner.logs().to_vec(),
                );
                tracing::info!(
                    tx_hash = %tx_hash,
                    status = %settled.status,
                    block_number = ?settled.block_number,
                    "Receipt observed"
                );
                Ok(settled)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                tracing::warn!(tx_hash = %tx_hash, "No receipt within wait policy");
                Err(BlockchainError::ReceiptTimeout {
                    hash: tx_hash,
                    waited_secs: policy.timeout.as_secs(),
                })
            }
        }
    }

    /// Address of the bound signer.
    pub fn signer_address(&self) -> Address {
        self.signer
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("signer", &self.signer)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock::{fast_config, mocked_client, receipt_json, TEST_PRIVATE_KEY};
    use crate::blockchain::transaction::TxStatus;
    use alloy::primitives::U64;

    fn test_config() -> ChainConfig {
        ChainConfig {
            // Nothing listens on port 1.
            rpc_url: "http://127.0.0.1:1".to_string(),
            chain_id: None,
            rpc_timeout_secs: 2,
            receipt_timeout_secs: 2,
            poll_interval_ms: 100,
            confirmation_blocks: 1,
        }
    }

    fn pending_withdraw() -> Transaction {
        Transaction::pending(TxHash::repeat_byte(0x42), Operation::Withdraw)
    }

    #[tokio::test]
    async fn test_connect_is_lazy_over_http() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let client = ChainClient::connect(test_config(), &wallet).await.unwrap();
        assert_eq!(client.signer_address(), wallet.address());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_rpc_error() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let client = ChainClient::connect(test_config(), &wallet).await.unwrap();

        let result = client.get_native_balance(wallet.address()).await;
        assert!(matches!(
            result,
            Err(BlockchainError::Rpc(_)) | Err(BlockchainError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_chain_check_fails_when_unreachable() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let mut config = test_config();
        config.chain_id = Some(11155111);

        assert!(ChainClient::connect(config, &wallet).await.is_err());
    }

    #[tokio::test]
    async fn test_chain_mismatch() {
        let (client, asserter) = mocked_client(fast_config());
        asserter.push_success(&U64::from(1));

        let err = client.verify_chain_id(11155111).await.unwrap_err();
        assert!(matches!(err, BlockchainError::ChainMismatch { expected: 11155111, actual: 1 }));
    }

    #[tokio::test]
    async fn test_network_info_names_chain() {
        let (client, asserter) = mocked_client(fast_config());
        asserter.push_success(&U64::from(11155111));

        let info = client.get_network_info().await.unwrap();
        assert_eq!(info.name, "sepolia");
        assert_eq!(info.chain_id, ChainId(11155111));
    }

    #[tokio::test]
    async fn test_receipt_confirmed_after_pending_polls() {
        let (client, asserter) = mocked_client(fast_config());
        let tx = pending_withdraw();
        asserter.push_success(&serde_json::Value::Null);
        asserter.push_success(&serde_json::Value::Null);
        asserter.push_success(&receipt_json(tx.hash, 12, true, Vec::new()));

        let settled = client.await_receipt(tx).await.unwrap();
        assert_eq!(settled.status, TxStatus::Confirmed);
        assert_eq!(settled.block_number, Some(12));
        assert_eq!(settled.gas_used, Some(45_000));
    }

    #[tokio::test]
    async fn test_reverted_receipt_skips_confirmation_wait() {
        let mut config = fast_config();
        config.confirmation_blocks = 3;
        let (client, asserter) = mocked_client(config);
        let tx = pending_withdraw();
        // No eth_blockNumber answer is queued; a depth check would fail the call.
        asserter.push_success(&receipt_json(tx.hash, 12, false, Vec::new()));

        let settled = client.await_receipt(tx).await.unwrap();
        assert_eq!(settled.status, TxStatus::Reverted);
    }

    #[tokio::test]
    async fn test_waits_for_confirmation_depth() {
        let mut config = fast_config();
        config.confirmation_blocks = 3;
        let (client, asserter) = mocked_client(config);
        let tx = pending_withdraw();

        asserter.push_success(&receipt_json(tx.hash, 10, true, Vec::new()));
        asserter.push_success(&U64::from(10));
        asserter.push_success(&receipt_json(tx.hash, 10, true, Vec::new()));
        asserter.push_success(&U64::from(11));
        asserter.push_success(&receipt_json(tx.hash, 10, true, Vec::new()));
        asserter.push_success(&U64::from(12));

        let settled = client.await_receipt(tx).await.unwrap();
        assert_eq!(settled.status, TxStatus::Confirmed);

        // Every queued answer was needed.
        assert!(client.get_block_number().await.is_err());
    }

    #[tokio::test]
    async fn test_missing_receipt_times_out() {
        let mut config = fast_config();
        config.receipt_timeout_secs = 1;
        config.poll_interval_ms = 50;
        let (client, asserter) = mocked_client(config);
        for _ in 0..200 {
            asserter.push_success(&serde_json::Value::Null);
        }

        let tx = pending_withdraw();
        let hash = tx.hash;
        let err = client.await_receipt(tx).await.unwrap_err();
        assert!(matches!(
            err,
            BlockchainError::ReceiptTimeout { hash: h, waited_secs: 1 } if h == hash
        ));
    }

    #[tokio::test]
    async fn test_receipt_rpc_failure_propagates() {
        let (client, asserter) = mocked_client(fast_config());
        asserter.push_failure_msg("header not found");

        let err = client.await_receipt(pending_withdraw()).await.unwrap_err();
        match err {
            BlockchainError::Rpc(message) => assert!(message.starts_with("eth_getTransactionReceipt failed")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_failure_names_send_transaction() {
        let (client, asserter) = mocked_client(fast_config());
        for _ in 0..8 {
            asserter.push_failure_msg("insufficient funds for gas");
        }

        let request = TransactionRequest::default().with_to(Address::repeat_byte(0xaa));
        let err = client.submit(request, Operation::Deposit).await.unwrap_err();
        match err {
            BlockchainError::Rpc(message) => assert!(message.starts_with("send_transaction failed")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
