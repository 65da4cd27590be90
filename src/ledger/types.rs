//! Account snapshots and decoded ledger events.

use alloy::primitives::Address;
use alloy::rpc::types::Log;
use serde::Serialize;
use std::fmt;

use crate::ledger::abi::SecureBank;
use crate::ledger::amount::Amount;

/// Chain-side state of one account at a point in time.
///
/// Carries nothing read from the ledger contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub address: Address,
    /// Native currency held by the account itself.
    pub native_balance: Amount,
    pub transaction_count: u64,
}

/// An event emitted by the ledger contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    Deposit { user: Address, amount: Amount },
    Withdraw { user: Address, amount: Amount },
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerEvent::Deposit { user, amount } => write!(f, "Deposit(user={}, amount={})", user, amount),
            LedgerEvent::Withdraw { user, amount } => write!(f, "Withdraw(user={}, amount={})", user, amount),
        }
    }
}

/// Decode ledger events from receipt logs.
///
/// With `contract` set, logs emitted by any other address are ignored.
pub fn decode_events(logs: &[Log], contract: Option<Address>) -> Vec<LedgerEvent> {
    logs.iter()
        .filter(|log| contract.map_or(true, |address| log.address() == address))
        .filter_map(|log| {
            if let Ok(decoded) = log.log_decode::<SecureBank::Deposit>() {
                let event = decoded.inner.data;
                return Some(LedgerEvent::Deposit {
                    user: event.user,
                    amount: Amount::from_wei(event.amount),
                });
            }
            if let Ok(decoded) = log.log_decode::<SecureBank::Withdraw>() {
                let event = decoded.inner.data;
                return Some(LedgerEvent::Withdraw {
                    user: event.user,
                    amount: Amount::from_wei(event.amount),
                });
            }
            None
        })
        .collect()
}
