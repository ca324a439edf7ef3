use crate::render::{run_criteria, run_dataset_summary, run_recommend, DatasetArgs, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use city_match::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "City Match",
    about = "Rank cities against your own priorities from the command line or over HTTP",
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
    /// Compute the top cities for a set of weights and filters
    Recommend(RecommendArgs),
    /// Print headline figures about the dataset
    Dataset(DatasetArgs),
    /// List the scorable criteria and whether higher or lower is better
    Criteria,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured dataset CSV
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Dataset(args) => run_dataset_summary(args),
        Command::Criteria => {
            run_criteria();
            Ok(())
        }
    }
}
