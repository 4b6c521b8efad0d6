#![allow(dead_code)]

use clap::Parser;
use licensekit_cli::{run, Args};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes `contents` to a license file in a fresh directory.
pub fn license_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("license.ini");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

/// Parses `argv` and runs it, returning stdout.
pub fn run_cli(argv: &[&str]) -> anyhow::Result<String> {
    let args = Args::try_parse_from(std::iter::once("licensekit").chain(argv.iter().copied()))?;
    let mut out = Vec::new();
    run(&args, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}
