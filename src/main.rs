//! prepaid-manager - query and top up prepaid SIM balances through ModemManager
//!
//! Parses the command line, loads the configuration and hands the command to
//! the CLI service. Errors are printed and turned into a non-zero exit code.

use std::{error::Error, process};

use clap::Parser;
use prepaid_manager::{
    cli::{Cli, CliService, formatting::format_error},
    config::{Config, LogLevel},
    tracing_config,
};
use tracing::{Level, debug, span};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    let level = if cli.debug {
        LogLevel::Debug
    } else {
        config.general.log_level
    };

    if cli.log_file {
        tracing_config::init_with_file(level)?;
    } else {
        tracing_config::init(level)?;
    }

    let _span = span!(Level::INFO, "prepaid_manager").entered();
    debug!(command = ?cli.command, "Running command");

    let service = CliService::new(config);
    match service.execute(&cli).await {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> prepaid_manager::Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    }
}
