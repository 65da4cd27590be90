//! Fixed schema of the deployed ledger contract.

use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    /// Ether bank holding a balance per depositor.
    #[derive(Debug, PartialEq, Eq)]
    contract SecureBank {
        /// Emitted when `user` deposits `amount` wei.
        event Deposit(address indexed user, uint256 amount);

        /// Emitted when `user` withdraws `amount` wei.
        event Withdraw(address indexed user, uint256 amount);

        function deposit() external payable;

        function withdraw(uint256 _amount) external;

        function balances(address) external view returns (uint256);

        function getBalance() external view returns (uint256);
    }
}

/// State mutability of a contract function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Payable,
    NonPayable,
    View,
}

/// The four functions of the ledger contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerCall {
    Deposit,
    Withdraw,
    Balances,
    GetBalance,
}

impl LedgerCall {
    pub const ALL: [LedgerCall; 4] = [
        LedgerCall::Deposit,
        LedgerCall::Withdraw,
        LedgerCall::Balances,
        LedgerCall::GetBalance,
    ];

    /// Canonical Solidity signature.
    pub fn signature(&self) -> &'static str {
        match self {
            LedgerCall::Deposit => SecureBank::depositCall::SIGNATURE,
            LedgerCall::Withdraw => SecureBank::withdrawCall::SIGNATURE,
            LedgerCall::Balances => SecureBank::balancesCall::SIGNATURE,
            LedgerCall::GetBalance => SecureBank::getBalanceCall::SIGNATURE,
        }
    }

    /// Four-byte function selector.
    pub fn selector(&self) -> [u8; 4] {
        match self {
            LedgerCall::Deposit => SecureBank::depositCall::SELECTOR,
            LedgerCall::Withdraw => SecureBank::withdrawCall::SELECTOR,
            LedgerCall::Balances => SecureBank::balancesCall::SELECTOR,
            LedgerCall::GetBalance => SecureBank::getBalanceCall::SELECTOR,
        }
    }

    pub fn mutability(&self) -> Mutability {
        match self {
            LedgerCall::Deposit => Mutability::Payable,
            LedgerCall::Withdraw => Mutability::NonPayable,
            LedgerCall::Balances | LedgerCall::GetBalance => Mutability::View,
        }
    }

    /// Whether calling this function produces a transaction.
    pub fn is_state_changing(&self) -> bool {
        self.mutability() != Mutability::View
    }
}
