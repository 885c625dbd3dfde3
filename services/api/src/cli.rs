use crate::commands::{run_query, Query};
use crate::{server, stdio};
use clap::{Args, Parser, Subcommand};
use leave_desk::config::{AppConfig, StorageConfig};
use leave_desk::error::AppError;
use leave_desk::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Leave Desk",
    about = "Check leave balances and apply for leave against the holiday calendar",
    version
)]
struct Cli {
    /// Override the JSON file backing the leave store
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Serve the leave tools as line-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// Show an employee's leave balance and history
    Balance {
        /// Employee name, matched exactly
        employee_name: String,
    },
    /// Apply for a day of leave
    Apply {
        /// Employee name, matched exactly
        employee_name: String,
        /// Leave date (YYYY-MM-DD)
        leave_date: String,
    },
    /// List every employee in the store
    Employees,
    /// Show the holiday calendar
    Holidays,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(path) = cli.data {
        config.storage = StorageConfig::new(path)?;
    }
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Stdio => stdio::run(&config).await,
        Command::Balance { employee_name } => run_query(&config, Query::Balance { employee_name }),
        Command::Apply {
            employee_name,
            leave_date,
        } => run_query(
            &config,
            Query::Apply {
                employee_name,
                leave_date,
            },
        ),
        Command::Employees => run_query(&config, Query::Employees),
        Command::Holidays => run_query(&config, Query::Holidays),
    }
}
