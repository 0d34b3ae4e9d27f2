//! Fivetran lineage importer CLI

use clap::Parser;
use fivetran_lineage::cli::{Cli, Runner};
use fivetran_lineage::Error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    let runner = Runner::new(cli);
    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        // A bad API key is never worth retrying
        let code = if matches!(e, Error::Unauthorized) { 2 } else { 1 };
        std::process::exit(code);
    }
}
