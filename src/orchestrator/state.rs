//! Named states of a run.

use serde::Serialize;
use std::fmt;

/// Where a run is. `Done` and `Aborted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    ValidatingDeposit,
    ConfirmingDeposit,
    SubmittingDeposit,
    AwaitingDepositReceipt,
    #[serde(rename = "checking_balance_1")]
    CheckingBalance1,
    #[serde(rename = "checking_total_1")]
    CheckingTotal1,
    ValidatingWithdraw,
    ConfirmingWithdraw,
    SubmittingWithdraw,
    AwaitingWithdrawReceipt,
    #[serde(rename = "checking_balance_2")]
    CheckingBalance2,
    #[serde(rename = "checking_total_2")]
    CheckingTotal2,
    Done,
    Aborted,
}

impl RunState {
    /// Every state a successful run visits, in order.
    pub const HAPPY_PATH: [RunState; 14] = [
        RunState::Idle,
        RunState::ValidatingDeposit,
        RunState::ConfirmingDeposit,
        RunState::SubmittingDeposit,
        RunState::AwaitingDepositReceipt,
        RunState::CheckingBalance1,
        RunState::CheckingTotal1,
        RunState::ValidatingWithdraw,
        RunState::ConfirmingWithdraw,
        RunState::SubmittingWithdraw,
        RunState::AwaitingWithdrawReceipt,
        RunState::CheckingBalance2,
        RunState::CheckingTotal2,
        RunState::Done,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Aborted)
    }

    /// Successor on success. Terminal states have none.
    pub fn next(&self) -> Option<RunState> {
        if self.is_terminal() {
            return None;
        }
        let idx = Self::HAPPY_PATH.iter().position(|s| s == self)?;
        Self::HAPPY_PATH.get(idx + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::ValidatingDeposit => "validating_deposit",
            RunState::ConfirmingDeposit => "confirming_deposit",
            RunState::SubmittingDeposit => "submitting_deposit",
            RunState::AwaitingDepositReceipt => "awaiting_deposit_receipt",
            RunState::CheckingBalance1 => "checking_balance_1",
            RunState::CheckingTotal1 => "checking_total_1",
            RunState::ValidatingWithdraw => "validating_withdraw",
            RunState::ConfirmingWithdraw => "confirming_withdraw",
            RunState::SubmittingWithdraw => "submitting_withdraw",
            RunState::AwaitingWithdrawReceipt => "awaiting_withdraw_receipt",
            RunState::CheckingBalance2 => "checking_balance_2",
            RunState::CheckingTotal2 => "checking_total_2",
            RunState::Done => "done",
            RunState::Aborted => "aborted",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
