use crate::demo::{run_demo, run_indexation_report, DemoArgs, IndexationReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lease_keeper::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lease Keeper",
    about = "Run the lease keeper service or explore its lease lifecycle from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print upcoming rent indexations for the demo portfolio
    Indexations(IndexationReportArgs),
    /// Walk through a lease lifecycle on the demo portfolio
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory store with the demo portfolio
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Indexations(args) => run_indexation_report(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_indexation_report_date() {
        let cli = Cli::try_parse_from(["lease-keeper", "indexations", "--today", "2024-01-01"])
            .expect("arguments parse");
        match cli.command {
            Some(Command::Indexations(args)) => {
                assert_eq!(args.today, chrono::NaiveDate::from_ymd_opt(2024, 1, 1));
                assert!(!args.json);
            }
            other => panic!("expected indexations command, got {other:?}"),
        }
    }
}
