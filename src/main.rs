//! reporg - Search git repositories with ripgrep and generate shareable references
//!
//! reporg provides:
//! - Repository root validation and deduplication via git
//! - GitHub owner/name/branch discovery from the origin remote
//! - Streaming ripgrep integration (rg --json)
//! - TSV output with GitHub blob links, flushed per line

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backends;
mod cli;
mod core;
mod flows;

/// Send diagnostics to stderr; stdout carries only TSV records
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    cli::run(cli)
}
