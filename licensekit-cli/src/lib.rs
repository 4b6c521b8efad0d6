//! Argument parsing and command dispatch for the `licensekit` binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use licensekit_config::ConfigStore;
use licensekit_license::{Licensing, SerialNumberData};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "licensekit")]
#[command(about = "Check serial numbers and activation codes against a license file")]
pub struct Args {
    /// License file (defaults to license.ini beside the executable)
    #[arg(short, long)]
    pub license: Option<PathBuf>,

    /// Section holding the license facts
    #[arg(short, long, default_value = licensekit_config::DEFAULT_SECTION)]
    pub section: String,

    /// Talk to the activation server instead of checking locally
    #[cfg(feature = "online")]
    #[arg(long)]
    pub online: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Evaluate a serial number and print its verdict and data as JSON
    Check { serial: String },
    /// Print this machine's hardware id
    Hwid,
    /// Trade an activation code for a serial number
    Activate { code: String },
    /// Release a serial number
    Deactivate { serial: String },
    /// Print an activation request for manual submission
    OfflineActivation { code: String },
    /// Print a deactivation request for manual submission
    OfflineDeactivation { serial: String },
}

/// Output of `check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// State bits as reported over the C ABI.
    pub bits: u32,
    #[serde(flatten)]
    pub data: SerialNumberData,
}

/// Loads the store named by `args`.
///
/// # Errors
///
/// Returns an error if an explicit license file exists but cannot be read.
pub fn load_store(args: &Args) -> Result<ConfigStore> {
    let store = match &args.license {
        Some(path) => ConfigStore::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ConfigStore::beside_executable_or_empty(),
    };
    debug!(present = store.is_present(), section = %args.section, "license store loaded");
    Ok(store.with_section(args.section.clone()))
}

/// Runs the command in `args`, writing results to `out`.
///
/// # Errors
///
/// Returns an error if the store cannot be loaded, an activation step
/// fails, or `out` cannot be written.
pub fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let licensing = Licensing::new(&load_store(args)?);

    match &args.command {
        Command::Check { serial } => {
            let state = licensing.set_serial_number(serial);
            info!(%state, "serial checked");
            let report = CheckReport {
                bits: state.bits(),
                data: licensing.serial_number_data(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        Command::Hwid => writeln!(out, "{}", licensing.current_hwid())?,
        Command::Activate { code } => {
            let serial = activate(args, &licensing, code)?;
            writeln!(out, "{serial}")?;
        }
        Command::Deactivate { serial } => {
            deactivate(args, &licensing, serial)?;
            writeln!(out, "deactivated")?;
        }
        Command::OfflineActivation { code } => {
            let request = licensing
                .offline_activation_string(code)
                .context("cannot build offline activation request")?;
            writeln!(out, "{request}")?;
        }
        Command::OfflineDeactivation { serial } => {
            let request = licensing
                .offline_deactivation_string(serial)
                .context("cannot build offline deactivation request")?;
            writeln!(out, "{request}")?;
        }
    }
    Ok(())
}

#[cfg_attr(not(feature = "online"), allow(unused_variables))]
fn activate(args: &Args, licensing: &Licensing, code: &str) -> Result<String> {
    #[cfg(feature = "online")]
    if args.online {
        let client = licensing.online().context("online activation unavailable")?;
        return runtime()?
            .block_on(client.activate(code))
            .context("activation failed");
    }
    licensing.activate_license(code).context("activation failed")
}

#[cfg_attr(not(feature = "online"), allow(unused_variables))]
fn deactivate(args: &Args, licensing: &Licensing, serial: &str) -> Result<()> {
    #[cfg(feature = "online")]
    if args.online {
        let client = licensing.online().context("online activation unavailable")?;
        return runtime()?
            .block_on(client.deactivate(serial))
            .context("deactivation failed");
    }
    licensing.deactivate_license(serial).context("deactivation failed")
}

#[cfg(feature = "online")]
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
