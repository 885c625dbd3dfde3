mod cli;
mod commands;
mod infra;
mod routes;
mod server;
mod stdio;

use leave_desk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
