//! Request Hole console - Main Entry Point
//!
//! Parses the command line, installs logging and hands over to the
//! selected command.

use clap::Parser;
use rhole::Cli;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    rhole::logging::init(&cli.log_level);

    tracing::debug!(endpoint = %cli.endpoint, "starting rhole v{}", env!("CARGO_PKG_VERSION"));

    rhole::run(&cli, BufReader::new(tokio::io::stdin()), std::io::stdout()).await?;
    Ok(())
}
