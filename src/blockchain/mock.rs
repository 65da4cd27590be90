//! Mocked-transport helpers for unit tests.
//!
//! Responses are queued on an [`Asserter`] and handed out one per RPC
//! round-trip, in order; an empty queue fails the next call.

use alloy::primitives::{Address, B256, TxHash};
use alloy::providers::mock::Asserter;
use alloy::providers::{Provider, ProviderBuilder};
use serde_json::{json, Value};

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::ChainConfig;
use crate::blockchain::wallet::Wallet;

/// Anvil's first account.
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Fast policies so polling tests finish quickly.
pub fn fast_config() -> ChainConfig {
    ChainConfig {
        rpc_url: "http://127.0.0.1:8545".to_string(),
        chain_id: None,
        rpc_timeout_secs: 2,
        receipt_timeout_secs: 5,
        poll_interval_ms: 10,
        confirmation_blocks: 1,
    }
}

/// Client whose every RPC is answered from the returned queue.
pub fn mocked_client(config: ChainConfig) -> (ChainClient, Asserter) {
    let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new()
        .wallet(wallet.ethereum_wallet())
        .connect_mocked_client(asserter.clone())
        .erased();
    (ChainClient::with_provider(provider, wallet.address(), config), asserter)
}

/// `eth_getTransactionReceipt` result for an EIP-1559 transaction.
pub fn receipt_json(hash: TxHash, block: u64, success: bool, logs: Vec<Value>) -> Value {
    json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0xafc8",
        "logs": logs,
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": format!("{:#x}", block),
        "gasUsed": "0xafc8",
        "effectiveGasPrice": "0x3b9aca00",
        "from": Address::repeat_byte(0x5e),
        "to": Address::repeat_byte(0xaa),
        "contractAddress": null,
    })
}

/// A log emitted by `address` in the transaction `hash`.
pub fn log_json(address: Address, hash: TxHash, block: u64, topics: Vec<B256>, data: Vec<u8>) -> Value {
    json!({
        "address": address,
        "topics": topics,
        "data": alloy::primitives::Bytes::from(data),
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": format!("{:#x}", block),
        "transactionHash": hash,
        "transactionIndex": "0x0",
        "logIndex": "0x0",
        "removed": false,
    })
}
