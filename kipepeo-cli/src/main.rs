use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use kipepeo_cli::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    kipepeo_cli::run(cli)
}

/// Logs go to stderr so they never mix with the report on stdout.
/// RUST_LOG overrides the level picked by --verbose.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
