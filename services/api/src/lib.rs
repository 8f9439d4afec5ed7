mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use lease_keeper::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
