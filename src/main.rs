mod cli;
mod commands;
mod error;
mod manifest;
mod model;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::error::ConfigError;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        if let Some(ConfigError::Read { .. }) = err.downcast_ref::<ConfigError>() {
            println!("USAGE: smartassess sweep <config_file>");
        }
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep(args) => commands::sweep::run(args),
        Commands::Aggregate(args) => commands::aggregate::run(args),
        Commands::Status(args) => commands::status::run(args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
