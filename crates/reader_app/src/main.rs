mod app;
mod cli;
mod config;
mod render;

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use reader_logging::{reader_error, LogDestination};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    if cli.verbose {
        reader_logging::initialize(LogDestination::Both, LevelFilter::Debug);
    } else {
        reader_logging::initialize(LogDestination::File, LevelFilter::Info);
    }

    match app::run(cli).await {
        Ok(code) => code,
        Err(err) => {
            reader_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
