use clap::Parser;
use ledgerlens::args::{Args, Command};
use ledgerlens::{commands, DataService, Ledger, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");

    // The category listing is static and does not need a ledger.
    if matches!(args.command(), Command::Categories) {
        commands::categories()?.print();
        return Ok(());
    }

    let path = match args.common().csv() {
        Some(path) => path.clone(),
        None => ledgerlens::discover_csv(std::env::current_dir()?).await?,
    };
    let service = load_service(&path).await?;

    let _: () = match args.command() {
        Command::Info => commands::info(&service, &path).await?.print(),
        Command::Categories => unreachable!("handled above"),
        Command::Chart(chart_args) => commands::chart(&service, chart_args).await?.print(),
        Command::Table(table_args) => commands::table(&service, table_args).await?.print(),
    };
    Ok(())
}

/// Loads the CSV off the async context and builds the service over it.
async fn load_service(path: &PathBuf) -> Result<DataService> {
    let path = path.clone();
    let ledger = tokio::task::spawn_blocking(move || Ledger::load(&path)).await??;
    DataService::new(ledger)
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
