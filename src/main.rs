//! secure-bank
//!
//! Deposits into and withdraws from a deployed bank contract with one signer.
//!
//! ```text
//!   .env / flags / config.toml
//!            │
//!            ▼
//!   ┌─────────────────┐     ┌──────────────┐     ┌─────────────┐
//!   │ lifecycle       │────▶│ ledger proxy │────▶│ ChainClient │────▶ JSON-RPC
//!   │ (AppContext)    │     └──────▲───────┘     └─────────────┘
//!   └────────┬────────┘            │
//!            ▼                     │
//!   ┌─────────────────┐            │
//!   │ orchestrator    │────────────┘
//!   │ (state machine) │◀──── operator (stdin/stdout)
//!   └─────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use secure_bank::config::{load_config, ConfigOverrides};
use secure_bank::lifecycle::{signals, AppContext};
use secure_bank::observability::init_logging;
use secure_bank::operator::{Operator, TerminalOperator};
use secure_bank::TransactionOrchestrator;

/// Exit status for failures before the run starts.
const STARTUP_FAILURE: u8 = 2;
/// Exit status when interrupted with Ctrl-C.
const INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "secure-bank")]
#[command(about = "Deposit into and withdraw from a SecureBank contract", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint.
    #[arg(long, env = "SEPOLIA_RPC_URL")]
    rpc_url: Option<String>,

    /// Deployed bank contract address.
    #[arg(long, env = "CONTRACT_ADDRESS")]
    contract: Option<String>,

    /// Expected chain id; startup fails if the endpoint reports another.
    #[arg(long)]
    chain_id: Option<u64>,

    /// Maximum seconds to wait for each receipt.
    #[arg(long)]
    receipt_timeout_secs: Option<u64>,

    /// Skip the "Press Enter" confirmation gates.
    #[arg(short, long)]
    yes: bool,

    /// Print the final run report as JSON.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            rpc_url: self.rpc_url.clone(),
            contract_address: self.contract.clone(),
            chain_id: self.chain_id,
            receipt_timeout_secs: self.receipt_timeout_secs,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; real environment variables take precedence.
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            tracing::error!(error = %e, "Configuration rejected");
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(STARTUP_FAILURE);
        }
    };
    init_logging(&config.observability.log_level);

    tracing::info!(
        rpc_url = %config.chain.rpc_url,
        contract = %config.contract.address,
        receipt_timeout_secs = config.chain.receipt_timeout_secs,
        "Configuration loaded"
    );

    let ctx = match AppContext::build(config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            eprintln!("Startup failed: {}", e);
            return ExitCode::from(STARTUP_FAILURE);
        }
    };

    let mut operator = TerminalOperator::stdin(cli.yes);
    operator.status("Setup complete:");
    operator.status(&format!("- Connected to: {}", ctx.config.chain.rpc_url));
    operator.status(&format!("- Signer Address: {}", ctx.ledger.client().signer_address()));
    operator.status(&format!("- Contract Address: {}", ctx.ledger.address()));

    let orchestrator = TransactionOrchestrator::new(ctx.ledger, operator);

    let report = tokio::select! {
        report = orchestrator.run() => report,
        err = signals::interrupted() => {
            eprintln!("{}", err);
            return ExitCode::from(INTERRUPTED);
        }
    };

    println!();
    for line in report.summary() {
        println!("{}", line);
    }

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!(error = %e, "Cannot serialize run report"),
        }
    }

    ExitCode::from(report.exit_code())
}
