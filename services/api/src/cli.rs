use crate::report::{run_explain, run_offers, ExplainArgs, OffersArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use credit_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Credit Insights",
    about = "Serve or query pre-approved offers and decision explanations",
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
    /// Resolve the offers a customer profile qualifies for
    Offers(OffersArgs),
    /// Explain a loan decision and list improvement scenarios
    Explain(ExplainArgs),
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
        Command::Offers(args) => run_offers(args),
        Command::Explain(args) => run_explain(args),
    }
}
