mod cli;
mod config;
mod error;
mod jenkins;
mod output;
mod trends;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting RoboTrend - Jenkins pass-rate trends");
    cli.execute().await
}
