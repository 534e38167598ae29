use chrono::Local;
use clap::Parser;
use finance_tracker::args::{Args, Command};
use finance_tracker::{commands, Config, ErrorType, IntoResult, Mode, Result};
use std::path::Path;
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
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for running the program without a transaction service. When
    // FINTRACK_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Rest.
    let mode = Mode::from_env();

    // Ledger dates and the generation time are shown in the local offset.
    let now = Local::now().fixed_offset();

    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.api_url(), init_args.logo())
                .await?
                .print()
        }

        Command::List => commands::list(load_config(home).await?, mode, *now.offset())
            .await?
            .print(),

        Command::Add(add_args) => commands::add(load_config(home).await?, mode, add_args.clone())
            .await?
            .print(),

        Command::Delete(delete_args) => {
            commands::delete(load_config(home).await?, mode, delete_args.clone())
                .await?
                .print()
        }

        Command::Summary => commands::summary(load_config(home).await?, mode)
            .await?
            .print(),

        Command::Export(export_args) => {
            commands::export(load_config(home).await?, mode, export_args.out(), now)
                .await?
                .print()
        }
    };
    Ok(())
}

async fn load_config(home: &Path) -> Result<Config> {
    Config::load(home).await.pub_result(ErrorType::Config)
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
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
