use clap::Parser;
use hearth_ledger::args::{Args, Command, RecurringSubcommand};
use hearth_ledger::{commands, Config, Mode, Result};
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
    let home = args.common().hearth_home().path();

    // This allows for testing the program without hitting the Google APIs.
    // When HEARTH_IN_TEST_MODE is set and non-zero in length, the mode will
    // be Mode::Test, otherwise it will be Mode::Google.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.clone()).await?.print(),

        Command::Unlock(unlock_args) => {
            let config = Config::load(home).await?;
            commands::unlock(config, unlock_args.clone()).await?.print()
        }

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            commands::add(config, mode, add_args.clone()).await?.print()
        }

        Command::List(list_args) => {
            let config = Config::load(home).await?;
            commands::list(config, mode, list_args.clone()).await?.print()
        }

        Command::Edit(edit_args) => {
            let config = Config::load(home).await?;
            commands::edit(config, mode, edit_args.clone()).await?.print()
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            commands::delete(config, mode, delete_args.clone())
                .await?
                .print()
        }

        Command::Summary(summary_args) => {
            let config = Config::load(home).await?;
            commands::summary(config, mode, summary_args.clone())
                .await?
                .print()
        }

        Command::Calendar(calendar_args) => {
            let config = Config::load(home).await?;
            commands::calendar(config, mode, calendar_args.clone())
                .await?
                .print()
        }

        Command::Report(report_args) => {
            let config = Config::load(home).await?;
            commands::report(config, mode, report_args.clone())
                .await?
                .print()
        }

        Command::Recurring(recurring_args) => {
            let config = Config::load(home).await?;
            match recurring_args.command() {
                RecurringSubcommand::Add(add_args) => {
                    commands::recurring_add(config, mode, add_args.clone())
                        .await?
                        .print()
                }
                RecurringSubcommand::List => {
                    commands::recurring_list(config, mode).await?.print()
                }
                RecurringSubcommand::Delete(delete_args) => {
                    commands::recurring_delete(config, mode, delete_args.clone())
                        .await?
                        .print()
                }
                RecurringSubcommand::Apply(apply_args) => {
                    commands::recurring_apply(config, mode, apply_args.clone())
                        .await?
                        .print()
                }
            }
        }
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
                "hearth_ledger={},{}={}",
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
