//! licensekit command-line tool
//!
//! Inspects a license file the way an embedding application would.
//!
//! Usage:
//!   licensekit --license license.ini check ABC123
//!   licensekit hwid

use anyhow::Result;
use clap::Parser;
use licensekit_cli::{run, Args};
use std::io;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    run(&args, &mut io::stdout().lock())
}
