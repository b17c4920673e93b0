//! Signet binary: user API server, offline verifier and key tooling.

mod cli;
mod commands;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::output::OutputFormat;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("signet=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let format = OutputFormat::from_json_flag(cli.json);

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::run(&args).await,
        Some(Commands::Verify(args)) => commands::verify::run(&args, format).await,
        Some(Commands::Keys(args)) => commands::keys::run(&args, format).await,
        Some(Commands::Health(args)) => commands::health::run(&args).await,
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
