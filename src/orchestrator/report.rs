//! Outcome of a run and balance reconciliation.

use alloy::primitives::Address;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::blockchain::transaction::{Operation, Transaction};
use crate::blockchain::types::NetworkInfo;
use crate::error::BankError;
use crate::ledger::{AccountSnapshot, Amount, LedgerEvent};
use crate::orchestrator::state::RunState;

/// The step a run stopped at and why.
#[derive(Debug)]
pub struct StepFailure {
    pub step: RunState,
    pub error: BankError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.step, self.error)
    }
}

impl Serialize for StepFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("StepFailure", 2)?;
        s.serialize_field("step", &self.step)?;
        s.serialize_field("error", &self.error.to_string())?;
        s.end()
    }
}

/// Observed recorded balance against what the confirmed operation implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub operation: Operation,
    pub before: Amount,
    pub amount: Amount,
    /// `None` when `before ± amount` leaves the uint256 range.
    pub expected: Option<Amount>,
    pub observed: Amount,
}

impl Reconciliation {
    pub fn new(operation: Operation, before: Amount, amount: Amount, observed: Amount) -> Self {
        let expected = match operation {
            Operation::Deposit => before.checked_add(amount),
            Operation::Withdraw => before.checked_sub(amount),
        };
        Self {
            operation,
            before,
            amount,
            expected,
            observed,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.expected == Some(self.observed)
    }
}

/// Everything a run observed, whether it finished or not.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// `Done` or `Aborted` once the run returns.
    pub state: RunState,
    /// States entered, in order.
    pub trace: Vec<RunState>,
    pub failure: Option<StepFailure>,
    pub signer: Address,
    pub network: Option<NetworkInfo>,
    pub account: Option<AccountSnapshot>,
    pub deposit_amount: Option<Amount>,
    pub deposit: Option<Transaction>,
    pub balance_after_deposit: Option<Amount>,
    pub total_after_deposit: Option<Amount>,
    pub withdraw_amount: Option<Amount>,
    pub withdraw: Option<Transaction>,
    pub balance_after_withdraw: Option<Amount>,
    pub total_after_withdraw: Option<Amount>,
    /// Withdrawal checked against the balance read after the deposit.
    pub reconciliation: Option<Reconciliation>,
    pub events: Vec<LedgerEvent>,
}

impl RunReport {
    pub fn new(signer: Address) -> Self {
        Self {
            state: RunState::Idle,
            trace: Vec::new(),
            failure: None,
            signer,
            network: None,
            account: None,
            deposit_amount: None,
            deposit: None,
            balance_after_deposit: None,
            total_after_deposit: None,
            withdraw_amount: None,
            withdraw: None,
            balance_after_withdraw: None,
            total_after_withdraw: None,
            reconciliation: None,
            events: Vec::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    /// Process exit status: zero only for a completed run.
    pub fn exit_code(&self) -> u8 {
        if self.is_done() { 0 } else { 1 }
    }

    /// Whether the run reached `state`.
    pub fn visited(&self, state: RunState) -> bool {
        self.trace.contains(&state)
    }

    /// Human-readable summary lines.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!("Run {}", self.state)];
        if let Some(failure) = &self.failure {
            lines.push(format!("- Failure: {}", failure));
        }
        for tx in self.deposit.iter().chain(self.withdraw.iter()) {
            lines.push(format!("- {} {}: {}", tx.operation, tx.hash, tx.status));
        }
        let balance = self.balance_after_withdraw.or(self.balance_after_deposit);
        if let Some(balance) = balance {
            lines.push(format!("- Your balance: {} ETH", balance.to_ether()));
        }
        let total = self.total_after_withdraw.or(self.total_after_deposit);
        if let Some(total) = total {
            lines.push(format!("- Contract total: {} ETH", total.to_ether()));
        }
        if let Some(rec) = self.reconciliation.as_ref().filter(|r| !r.is_consistent()) {
            lines.push(format!(
                "- Warning: {} expected balance {} but observed {}",
                rec.operation,
                rec.expected.map(|a| a.to_string()).unwrap_or_else(|| "out of range".to_string()),
                rec.observed
            ));
        }
        lines
    }
}
