//! Binary crate for the `forecast-collector` service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logger setup
//! - Interactive configuration
//! - Handing the loaded configuration to the scheduler

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
