//! Confessio binary entry point.

use clap::Parser;
use tracing::error;

mod cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();
    cli::init_tracing(cli.verbose);

    if let Err(e) = cli.execute().await {
        error!("{e}");
        std::process::exit(1);
    }
}
