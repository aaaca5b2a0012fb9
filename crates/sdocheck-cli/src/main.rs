//! sdocheck CLI main entry point

use anyhow::Result;
use clap::Parser;
use sdocheck_cli::commands::{Cli, CommandExecutor};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so reports on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut executor = CommandExecutor::new();
    let result = executor.execute(cli.command).await?;

    if result.success {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}
