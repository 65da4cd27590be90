//! Shared doubles for orchestration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use secure_bank::blockchain::{ChainId, NetworkInfo, Operation, Transaction, TxStatus};
use secure_bank::error::{BankError, BankResult};
use secure_bank::ledger::{AccountSnapshot, Amount, Ledger};
use secure_bank::operator::Operator;

/// Every interaction the orchestrator has with the ledger, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Call {
    Network,
    Account,
    Deposit(Amount),
    Withdraw(Amount),
    BalanceOf,
    TotalBalance,
    Receipt(Operation, TxStatus),
}

#[derive(Debug, Default)]
struct MockState {
    balances: HashMap<Address, Amount>,
    total: Amount,
    native: Amount,
    nonce: u64,
    pending: HashMap<TxHash, (Operation, Amount)>,
    calls: Vec<Call>,
    fail_deposit_submit: bool,
    fail_balance_reads: bool,
    receipts_time_out: bool,
    withdraw_fee: Amount,
}

/// In-memory ledger contract: per-account balances plus a total.
#[derive(Debug, Clone)]
pub struct MockLedger {
    signer: Address,
    state: Arc<Mutex<MockState>>,
}

#[allow(dead_code)]
impl MockLedger {
    pub fn new(signer: Address) -> Self {
        let state = MockState {
            native: Amount::from(10_000_000_000_000_000_000u64),
            ..Default::default()
        };
        Self {
            signer,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Funds deposited by other accounts before the run.
    pub fn with_foreign_deposit(self, who: Address, amount: Amount) -> Self {
        {
            let mut s = self.state.lock().unwrap();
            s.balances.insert(who, amount);
            s.total = s.total.checked_add(amount).unwrap();
        }
        self
    }

    pub fn failing_deposit_submit(self) -> Self {
        self.state.lock().unwrap().fail_deposit_submit = true;
        self
    }

    pub fn failing_balance_reads(self) -> Self {
        self.state.lock().unwrap().fail_balance_reads = true;
        self
    }

    pub fn timing_out_receipts(self) -> Self {
        self.state.lock().unwrap().receipts_time_out = true;
        self
    }

    /// Debit more than withdrawn, as a fee-taking contract would.
    pub fn with_withdraw_fee(self, fee: Amount) -> Self {
        self.state.lock().unwrap().withdraw_fee = fee;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn recorded_balance(&self, who: Address) -> Amount {
        self.state.lock().unwrap().balances.get(&who).copied().unwrap_or_default()
    }

    pub fn recorded_total(&self) -> Amount {
        self.state.lock().unwrap().total
    }

    fn broadcast(&self, operation: Operation, amount: Amount) -> Transaction {
        let mut s = self.state.lock().unwrap();
        s.nonce += 1;
        let hash = TxHash::with_last_byte(s.nonce as u8);
        s.pending.insert(hash, (operation, amount));
        Transaction::pending(hash, operation)
    }
}

#[async_trait]
impl Ledger for MockLedger {
    fn signer(&self) -> Address {
        self.signer
    }

    async fn network(&self) -> BankResult<NetworkInfo> {
        self.state.lock().unwrap().calls.push(Call::Network);
        Ok(NetworkInfo::from(ChainId(31337)))
    }

    async fn account(&self, address: Address) -> BankResult<AccountSnapshot> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(Call::Account);
        Ok(AccountSnapshot {
            address,
            native_balance: s.native,
            transaction_count: s.nonce,
        })
    }

    async fn deposit(&self, amount: Amount) -> BankResult<Transaction> {
        {
            let mut s = self.state.lock().unwrap();
            s.calls.push(Call::Deposit(amount));
            if s.fail_deposit_submit {
                return Err(BankError::RpcConnection("connection refused".to_string()));
            }
        }
        Ok(self.broadcast(Operation::Deposit, amount))
    }

    async fn withdraw(&self, amount: Amount) -> BankResult<Transaction> {
        self.state.lock().unwrap().calls.push(Call::Withdraw(amount));
        Ok(self.broadcast(Operation::Withdraw, amount))
    }

    async fn balance_of(&self, address: Address) -> BankResult<Amount> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(Call::BalanceOf);
        if s.fail_balance_reads {
            return Err(BankError::RpcConnection("eth_call failed: 502".to_string()));
        }
        Ok(s.balances.get(&address).copied().unwrap_or_default())
    }

    async fn total_balance(&self) -> BankResult<Amount> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(Call::TotalBalance);
        Ok(s.total)
    }

    async fn await_receipt(&self, tx: Transaction) -> BankResult<Transaction> {
        let mut s = self.state.lock().unwrap();
        if s.receipts_time_out {
            return Err(BankError::TransactionTimeout {
                hash: tx.hash,
                waited_secs: 300,
            });
        }

        let (operation, amount) = s
            .pending
            .remove(&tx.hash)
            .ok_or_else(|| BankError::RpcConnection("unknown transaction".to_string()))?;
        let signer = self.signer;
        let current = s.balances.get(&signer).copied().unwrap_or_default();

        let success = match operation {
            Operation::Deposit => {
                s.balances.insert(signer, current.checked_add(amount).unwrap());
                s.total = s.total.checked_add(amount).unwrap();
                true
            }
            Operation::Withdraw => {
                let debit = amount.checked_add(s.withdraw_fee).unwrap();
                match current.checked_sub(debit) {
                    Some(remaining) => {
                        s.balances.insert(signer, remaining);
                        s.total = s.total.checked_sub(debit).unwrap();
                        true
                    }
                    None => false,
                }
            }
        };

        let settled = tx.settle(success, Some(100 + s.nonce), 45_000, Vec::new());
        s.calls.push(Call::Receipt(operation, settled.status));
        Ok(settled)
    }
}

/// Operator answering from a script and recording status lines.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOperator {
    answers: Arc<Mutex<VecDeque<String>>>,
    decline: Arc<Mutex<Vec<String>>>,
    lines: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl ScriptedOperator {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.iter().map(|a| a.to_string()).collect())),
            ..Default::default()
        }
    }

    /// Decline any confirmation whose question contains `needle`.
    pub fn declining(self, needle: &str) -> Self {
        self.decline.lock().unwrap().push(needle.to_string());
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl Operator for ScriptedOperator {
    async fn ask(&mut self, _question: &str) -> BankResult<String> {
        self.answers.lock().unwrap().pop_front().ok_or(BankError::UserAbort)
    }

    async fn confirm(&mut self, question: &str) -> BankResult<()> {
        if self.decline.lock().unwrap().iter().any(|n| question.contains(n.as_str())) {
            return Err(BankError::UserAbort);
        }
        Ok(())
    }

    fn status(&mut self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
