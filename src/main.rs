use clap::Parser;
use facility_server::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Migrate { action } => cli::migrate::run(action).await,
        Command::Wait(args) => cli::wait::run(args).await,
    }
}
