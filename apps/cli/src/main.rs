//! # ScanPrice Entry Point
//!
//! Parses arguments, starts logging and hands over to [`scanprice_lib::run`].
//! The exit code is 1 when a one-shot command fails.

use anyhow::Context;
use clap::Parser;

use scanprice_lib::cli::Cli;
use scanprice_lib::Outcome;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    scanprice_lib::init_tracing();

    let outcome = scanprice_lib::run(cli)
        .await
        .context("scanprice could not run")?;

    if outcome == Outcome::Failure {
        std::process::exit(1);
    }
    Ok(())
}
