use chrono::{DateTime, Utc};
use clap::Parser;
use kedon::application::daily::{ClaimOutcome, DailyRewardEngine};
use kedon::application::ledger::Ledger;
use kedon::domain::account::Amount;
use kedon::domain::duration::format_duration;
use kedon::domain::ports::{AccountStoreBox, ClaimStoreBox};
use kedon::error::{EconomyError, Result as EconomyResult};
use kedon::infrastructure::in_memory::{InMemoryAccountStore, InMemoryClaimStore};
use kedon::interfaces::csv::balance_writer::BalanceWriter;
use kedon::interfaces::csv::operation_reader::{Operation, OperationReader, OperationType};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Limit the balance report to the top N accounts
    #[arg(long)]
    top: Option<usize>,
}

fn build_services(db_path: Option<PathBuf>) -> Result<(Arc<Ledger>, DailyRewardEngine)> {
    let (account_store, claim_store): (AccountStoreBox, ClaimStoreBox) = match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            let store =
                kedon::infrastructure::rocksdb::RocksDbStore::open(db_path).into_diagnostic()?;
            (Box::new(store.clone()), Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            return Err(miette::miette!(
                "persistent storage requires the `storage-rocksdb` feature"
            ));
        }
        None => (
            Box::new(InMemoryAccountStore::new()),
            Box::new(InMemoryClaimStore::new()),
        ),
    };

    let ledger = Arc::new(Ledger::new(account_store));
    let engine = DailyRewardEngine::new(claim_store, Arc::clone(&ledger));
    Ok((ledger, engine))
}

fn required_amount(operation: &Operation) -> EconomyResult<Amount> {
    let value = operation.amount.ok_or_else(|| {
        EconomyError::ValidationError("Operation missing amount".to_string())
    })?;
    Amount::new(value)
}

async fn run_operation(
    ledger: &Ledger,
    engine: &DailyRewardEngine,
    base: DateTime<Utc>,
    operation: Operation,
) -> EconomyResult<()> {
    match operation.op {
        OperationType::Credit => {
            let amount = required_amount(&operation)?;
            ledger.credit(&operation.user, amount).await?;
        }
        OperationType::Pay => {
            let target = operation.target.clone().filter(|t| !t.is_empty()).ok_or_else(|| {
                EconomyError::ValidationError("Pay operation missing target".to_string())
            })?;
            let amount = required_amount(&operation)?;

            if !ledger.transfer(&operation.user, &target, amount).await? {
                let balance = ledger.get_balance(&operation.user).await?;
                eprintln!(
                    "Insufficient funds: {} has {} coins",
                    operation.user, balance
                );
            }
        }
        OperationType::Claim => {
            let now = operation.resolve_at(base)?;
            match engine.claim(&operation.user, now).await? {
                ClaimOutcome::Claimed { .. } => {}
                ClaimOutcome::OnCooldown { next_eligible_at } => {
                    eprintln!(
                        "Daily already claimed for {}; next claim in {}",
                        operation.user,
                        format_duration(next_eligible_at - now)
                    );
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let (ledger, engine) = build_services(cli.db_path)?;

    // Relative `at` offsets in the input are anchored to process start.
    let base = Utc::now();

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for operation_result in reader.operations() {
        match operation_result {
            Ok(operation) => {
                if let Err(e) = run_operation(&ledger, &engine, base, operation).await {
                    eprintln!("Error processing operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Balance report, richest first.
    let accounts = ledger
        .leaderboard(cli.top.unwrap_or(usize::MAX))
        .await
        .into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer.write_accounts(accounts).into_diagnostic()?;

    Ok(())
}
