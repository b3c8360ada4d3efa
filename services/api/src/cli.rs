use crate::ingest::{run_ingest, IngestArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use credit_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Credit Approval Service",
    about = "Run the credit approval HTTP service and ingest workbook exports",
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
    /// Ingest customer/loan workbook exports and report the counts
    Ingest(IngestArgs),
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
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Ingest(args) => run_ingest(args),
    }
}
