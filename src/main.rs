use clap::Parser;
use fintrack::args::{AddSubcommand, Args, Command};
use fintrack::ledger::Ledger;
use fintrack::{commands, Config, Mode, Result};
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
    let config = Config::from_args(args.common())?;

    // This allows for running the program without hitting the Google APIs. When
    // FINTRACK_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Google.
    let mode = Mode::from_env();
    let ledger = Ledger::from_config(&config, mode)?;

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Serve(serve_args) => commands::serve(ledger, serve_args.bind()).await?.print(),

        Command::Dashboard => commands::dashboard(&ledger).await?.print(),

        Command::List(list_args) => commands::list(&ledger, list_args.kind()).await?.print(),

        Command::Add(add_args) => match add_args.entity() {
            AddSubcommand::Expense(args) => commands::add_expense(&ledger, args).await?.print(),
            AddSubcommand::Debt(args) => commands::add_debt(&ledger, args).await?.print(),
        },
    };
    Ok(())
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
