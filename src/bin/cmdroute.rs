//! cmdroute CLI Binary
//!
//! Command-line access to the command resolution cache, layered configuration
//! and session stores.

use anyhow::Context;
use clap::Parser;
use cmdroute::logging::{init_logging, LoggingConfig};
use cmdroute::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    // Logging goes up before the session stores load so their warnings are kept.
    let context = CliContext::new(cli.config_dir.clone(), |values| {
        let logging = LoggingConfig::from_values(values).unwrap_or_else(|e| {
            eprintln!("Warning: invalid logging configuration ({}), using defaults", e);
            LoggingConfig::default()
        });
        if let Err(e) = init_logging(&logging) {
            eprintln!("Warning: {}", e);
        }
    })
    .context("failed to initialize configuration")?;

    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
