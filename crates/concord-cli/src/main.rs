//! Concord CLI - portal-table reconciliation tool.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            reference,
            breed,
            capture,
            strategy,
            delimiter,
            filter_reference,
            report,
            json,
        } => commands::validate::run(
            reference,
            breed,
            capture,
            strategy,
            delimiter,
            filter_reference,
            report,
            json,
            cli.verbose,
        ),

        Commands::Capture {
            input,
            breed,
            output,
            delimiter,
        } => commands::capture::run(input, breed, output, delimiter, cli.verbose),

        Commands::Serve {
            capture,
            port,
            uploads,
            strategy,
        } => commands::serve::run(capture, port, uploads, strategy, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
