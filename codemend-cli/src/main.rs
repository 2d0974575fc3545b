//! codemend CLI entry point -- argument parsing, logging setup, dispatch.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use codemend_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging is initialized before config load so that load errors are
    // visible; --log-level overrides the default until the file is read.
    let mut general = GeneralConfig::default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    let writer = OutputWriter::new(cli.output);

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args, &cli.config, &writer).await,
        Commands::Scan(args) => commands::scan::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
