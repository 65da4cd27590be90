//! The deposit/withdraw state machine.
//!
//! One control loop drives a run from `Idle` to `Done` or `Aborted`. Each step
//! awaits exactly one suspension point (a network round-trip or an operator
//! gate) before the next step starts, so nothing runs concurrently and the
//! signer's nonce is never contended.

use alloy::primitives::Address;

use crate::blockchain::transaction::{Operation, Transaction, TxStatus};
use crate::error::{BankError, BankResult};
use crate::ledger::{Amount, Ledger};
use crate::operator::Operator;
use crate::orchestrator::report::{Reconciliation, RunReport, StepFailure};
use crate::orchestrator::state::RunState;

/// Position in a run together with the data the next step needs.
#[derive(Debug)]
enum Step {
    Idle,
    ValidatingDeposit,
    ConfirmingDeposit(Amount),
    SubmittingDeposit(Amount),
    AwaitingDepositReceipt(Transaction),
    CheckingBalance1,
    CheckingTotal1,
    ValidatingWithdraw,
    ConfirmingWithdraw(Amount),
    SubmittingWithdraw(Amount),
    AwaitingWithdrawReceipt(Amount, Transaction),
    CheckingBalance2(Amount),
    CheckingTotal2,
    Done,
}

impl Step {
    fn state(&self) -> RunState {
        match self {
            Step::Idle => RunState::Idle,
            Step::ValidatingDeposit => RunState::ValidatingDeposit,
            Step::ConfirmingDeposit(_) => RunState::ConfirmingDeposit,
            Step::SubmittingDeposit(_) => RunState::SubmittingDeposit,
            Step::AwaitingDepositReceipt(_) => RunState::AwaitingDepositReceipt,
            Step::CheckingBalance1 => RunState::CheckingBalance1,
            Step::CheckingTotal1 => RunState::CheckingTotal1,
            Step::ValidatingWithdraw => RunState::ValidatingWithdraw,
            Step::ConfirmingWithdraw(_) => RunState::ConfirmingWithdraw,
            Step::SubmittingWithdraw(_) => RunState::SubmittingWithdraw,
            Step::AwaitingWithdrawReceipt(..) => RunState::AwaitingWithdrawReceipt,
            Step::CheckingBalance2(_) => RunState::CheckingBalance2,
            Step::CheckingTotal2 => RunState::CheckingTotal2,
            Step::Done => RunState::Done,
        }
    }
}

/// Drives one deposit followed by one withdrawal for the ledger's signer.
pub struct TransactionOrchestrator<L, O> {
    ledger: L,
    operator: O,
    report: RunReport,
}

impl<L, O> TransactionOrchestrator<L, O>
where
    L: Ledger,
    O: Operator,
{
    pub fn new(ledger: L, operator: O) -> Self {
        let report = RunReport::new(ledger.signer());
        Self {
            ledger,
            operator,
            report,
        }
    }

    fn signer(&self) -> Address {
        self.report.signer
    }

    /// Run to a terminal state and return what was observed.
    pub async fn run(mut self) -> RunReport {
        let mut step = Step::Idle;

        loop {
            let state = step.state();
            self.report.trace.push(state);
            self.report.state = state;

            if state == RunState::Done {
                tracing::info!(signer = %self.signer(), "Run complete");
                break;
            }

            tracing::debug!(%state, "Entering state");
            match self.advance(step).await {
                Ok(next) => step = next,
                Err(error) => {
                    self.abort(state, error);
                    break;
                }
            }
        }

        self.report
    }

    fn abort(&mut self, step: RunState, error: BankError) {
        tracing::error!(%step, error = %error, "Run aborted");
        self.operator.status(&format!("Error during {}: {}", step, error));

        self.report.trace.push(RunState::Aborted);
        self.report.state = RunState::Aborted;
        self.report.failure = Some(StepFailure { step, error });
    }

    async fn advance(&mut self, step: Step) -> BankResult<Step> {
        match step {
            Step::Idle => {
                self.overview().await?;
                Ok(Step::ValidatingDeposit)
            }

            Step::ValidatingDeposit => {
                let amount = self.read_amount(Operation::Deposit).await?;
                self.report.deposit_amount = Some(amount);
                Ok(Step::ConfirmingDeposit(amount))
            }

            Step::ConfirmingDeposit(amount) => {
                self.operator.confirm("Press Enter to deposit...").await?;
                Ok(Step::SubmittingDeposit(amount))
            }

            Step::SubmittingDeposit(amount) => {
                self.operator.status(&format!("Depositing {} wei into the bank...", amount));
                let tx = self.ledger.deposit(amount).await?;
                self.report.deposit = Some(tx.clone());
                Ok(Step::AwaitingDepositReceipt(tx))
            }

            Step::AwaitingDepositReceipt(tx) => {
                self.settle(tx).await?;
                Ok(Step::CheckingBalance1)
            }

            Step::CheckingBalance1 => {
                let balance = self.ledger.balance_of(self.signer()).await?;
                self.report.balance_after_deposit = Some(balance);
                self.operator.status(&format!("Your balance is: {} ETH", balance.to_ether()));
                Ok(Step::CheckingTotal1)
            }

            Step::CheckingTotal1 => {
                let total = self.ledger.total_balance().await?;
                self.report.total_after_deposit = Some(total);
                self.operator
                    .status(&format!("Contract's total balance is: {} ETH", total.to_ether()));
                Ok(Step::ValidatingWithdraw)
            }

            Step::ValidatingWithdraw => {
                let amount = self.read_amount(Operation::Withdraw).await?;
                self.report.withdraw_amount = Some(amount);
                Ok(Step::ConfirmingWithdraw(amount))
            }

            Step::ConfirmingWithdraw(amount) => {
                self.operator.confirm("Press Enter to withdraw...").await?;
                Ok(Step::SubmittingWithdraw(amount))
            }

            Step::SubmittingWithdraw(amount) => {
                self.operator.status(&format!("Withdrawing {} wei from the bank...", amount));
                let tx = self.ledger.withdraw(amount).await?;
                self.report.withdraw = Some(tx.clone());
                Ok(Step::AwaitingWithdrawReceipt(amount, tx))
            }

            Step::AwaitingWithdrawReceipt(amount, tx) => {
                self.settle(tx).await?;
                Ok(Step::CheckingBalance2(amount))
            }

            Step::CheckingBalance2(amount) => {
                let balance = self.ledger.balance_of(self.signer()).await?;
                self.report.balance_after_withdraw = Some(balance);
                self.operator.status(&format!("Your new balance is: {} ETH", balance.to_ether()));

                if let Some(before) = self.report.balance_after_deposit {
                    self.reconcile(Reconciliation::new(Operation::Withdraw, before, amount, balance));
                }
                Ok(Step::CheckingTotal2)
            }

            Step::CheckingTotal2 => {
                let total = self.ledger.total_balance().await?;
                self.report.total_after_withdraw = Some(total);
                self.operator
                    .status(&format!("Contract's new total balance is: {} ETH", total.to_ether()));
                Ok(Step::Done)
            }

            Step::Done => Ok(Step::Done),
        }
    }

    /// Signer, network and native balance. The contract is not read before
    /// the deposit is broadcast.
    async fn overview(&mut self) -> BankResult<()> {
        let network = self.ledger.network().await?;
        let account = self.ledger.account(self.signer()).await?;

        self.operator.status(&format!("- Address: {}", account.address));
        self.operator
            .status(&format!("- ETH Balance: {} ETH", account.native_balance.to_ether()));
        self.operator
            .status(&format!("- Transaction Count: {}", account.transaction_count));
        self.operator
            .status(&format!("- Network: {} (chainId: {})", network.name, network.chain_id.0));

        tracing::info!(
            signer = %account.address,
            chain_id = network.chain_id.0,
            nonce = account.transaction_count,
            "Account overview"
        );

        self.report.network = Some(network);
        self.report.account = Some(account);
        Ok(())
    }

    async fn read_amount(&mut self, operation: Operation) -> BankResult<Amount> {
        let question = format!("How much wei do you want to {}?", operation);
        let raw = self.operator.ask(&question).await?;
        let amount = Amount::parse(&raw)?;
        tracing::debug!(%operation, %amount, "Amount accepted");
        Ok(amount)
    }

    /// Await the receipt of `tx` and require it to be confirmed.
    async fn settle(&mut self, tx: Transaction) -> BankResult<()> {
        let operation = tx.operation;
        let hash = tx.hash;

        let settled = match self.ledger.await_receipt(tx.clone()).await {
            Ok(settled) => settled,
            Err(err) => {
                if matches!(err, BankError::TransactionTimeout { .. }) {
                    self.record(tx.time_out());
                }
                return Err(err);
            }
        };

        self.record(settled.clone());
        match settled.status {
            TxStatus::Confirmed => {}
            TxStatus::Reverted => return Err(BankError::TransactionReverted { operation, hash }),
            // Ledgers report timeouts as errors, never as a returned status.
            status @ (TxStatus::TimedOut | TxStatus::Pending) => {
                return Err(BankError::RpcConnection(format!(
                    "{} transaction {} returned as {} without a receipt",
                    operation, hash, status
                )))
            }
        }

        let events = self.ledger.events(&settled);
        for event in &events {
            tracing::info!(%event, "Ledger event");
        }
        self.report.events.extend(events);

        let verb = match operation {
            Operation::Deposit => "Deposit",
            Operation::Withdraw => "Withdrawal",
        };
        self.operator
            .status(&format!("{} successful! Transaction hash: {}", verb, hash));
        Ok(())
    }

    fn record(&mut self, tx: Transaction) {
        match tx.operation {
            Operation::Deposit => self.report.deposit = Some(tx),
            Operation::Withdraw => self.report.withdraw = Some(tx),
        }
    }

    fn reconcile(&mut self, rec: Reconciliation) {
        if !rec.is_consistent() {
            tracing::warn!(
                operation = %rec.operation,
                before = %rec.before,
                amount = %rec.amount,
                observed = %rec.observed,
                "Recorded balance does not match confirmed operation"
            );
        }
        self.report.reconciliation = Some(rec);
    }
}
