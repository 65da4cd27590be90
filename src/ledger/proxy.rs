//! Typed access to the deployed ledger contract.
//!
//! [`Ledger`] is the seam the orchestrator drives; [`LedgerContractProxy`] is
//! its on-chain implementation. Views go through `eth_call` and never produce a
//! transaction; `deposit` and `withdraw` broadcast through the [`ChainClient`].

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;

use crate::blockchain::transaction::{Operation, Transaction};
use crate::blockchain::types::{BlockchainError, NetworkInfo};
use crate::blockchain::ChainClient;
use crate::error::BankResult;
use crate::ledger::abi::{LedgerCall, SecureBank};
use crate::ledger::amount::Amount;
use crate::ledger::types::{decode_events, AccountSnapshot, LedgerEvent};

/// Operations the orchestrator needs from the ledger and its chain.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// The account every transaction is signed by.
    fn signer(&self) -> Address;

    async fn network(&self) -> BankResult<NetworkInfo>;

    /// Native balance and nonce of `address`. Never calls the contract.
    async fn account(&self, address: Address) -> BankResult<AccountSnapshot>;

    /// Broadcast a value-bearing `deposit()`.
    async fn deposit(&self, amount: Amount) -> BankResult<Transaction>;

    /// Broadcast `withdraw(amount)`.
    async fn withdraw(&self, amount: Amount) -> BankResult<Transaction>;

    /// Recorded balance of `address`.
    async fn balance_of(&self, address: Address) -> BankResult<Amount>;

    /// Total held by the contract.
    async fn total_balance(&self) -> BankResult<Amount>;

    /// Block until `tx` settles.
    async fn await_receipt(&self, tx: Transaction) -> BankResult<Transaction>;

    /// Ledger events carried by a settled transaction.
    fn events(&self, tx: &Transaction) -> Vec<LedgerEvent> {
        decode_events(&tx.logs, None)
    }
}

/// On-chain [`Ledger`] backed by a deployed contract.
#[derive(Debug, Clone)]
pub struct LedgerContractProxy {
    client: ChainClient,
    address: Address,
}

impl LedgerContractProxy {
    pub fn new(client: ChainClient, address: Address) -> Self {
        Self { client, address }
    }

    /// Address of the contract.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn client(&self) -> &ChainClient {
        &self.client
    }

    fn request<C: SolCall>(&self, call: &C) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(self.address)
            .with_input(call.abi_encode())
    }

    async fn view<C: SolCall>(&self, kind: LedgerCall, call: C) -> BankResult<C::Return> {
        tracing::debug!(contract = %self.address, call = kind.signature(), "View call");
        let raw = self.client.call(self.request(&call)).await?;
        let decoded = C::abi_decode_returns(&raw)
            .map_err(|e| BlockchainError::Abi(format!("{}: {}", kind.signature(), e)))?;
        Ok(decoded)
    }
}

#[async_trait]
impl Ledger for LedgerContractProxy {
    fn signer(&self) -> Address {
        self.client.signer_address()
    }

    async fn network(&self) -> BankResult<NetworkInfo> {
        Ok(self.client.get_network_info().await?)
    }

    async fn account(&self, address: Address) -> BankResult<AccountSnapshot> {
        let native_balance = Amount::from_wei(self.client.get_native_balance(address).await?);
        let transaction_count = self.client.get_transaction_count(address).await?;

        Ok(AccountSnapshot {
            address,
            native_balance,
            transaction_count,
        })
    }

    async fn deposit(&self, amount: Amount) -> BankResult<Transaction> {
        let request = self
            .request(&SecureBank::depositCall {})
            .with_value(amount.wei());
        tracing::info!(contract = %self.address, amount = %amount, "Submitting deposit");
        Ok(self.client.submit(request, Operation::Deposit).await?)
    }

    async fn withdraw(&self, amount: Amount) -> BankResult<Transaction> {
        let request = self.request(&SecureBank::withdrawCall { _amount: amount.wei() });
        tracing::info!(contract = %self.address, amount = %amount, "Submitting withdraw");
        Ok(self.client.submit(request, Operation::Withdraw).await?)
    }

    async fn balance_of(&self, address: Address) -> BankResult<Amount> {
        let wei = self
            .view(LedgerCall::Balances, SecureBank::balancesCall(address))
            .await?;
        Ok(Amount::from_wei(wei))
    }

    async fn total_balance(&self) -> BankResult<Amount> {
        let wei = self
            .view(LedgerCall::GetBalance, SecureBank::getBalanceCall {})
            .await?;
        Ok(Amount::from_wei(wei))
    }

    async fn await_receipt(&self, tx: Transaction) -> BankResult<Transaction> {
        Ok(self.client.await_receipt(tx).await?)
    }

    fn events(&self, tx: &Transaction) -> Vec<LedgerEvent> {
        decode_events(&tx.logs, Some(self.address))
    }
}
