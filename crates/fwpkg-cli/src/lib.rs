//! fwpkg - firmware update package builder
#![allow(clippy::missing_errors_doc)]
//!
//! Packs a raw firmware image into the zip layout consumed by scooter
//! firmware updaters: `FIRM.bin` and/or `FIRM.bin.enc`, an `info.json`
//! manifest and optional `params.txt`.
//!
//! Metadata comes from a TOML firmware definition, command-line flags, or
//! both (flags win). The TEA key for encrypted images is read from `--key`
//! or `FWPKG_TEA_KEY`.

pub mod cmd;
pub mod ui;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable holding the TEA key as 32 hex characters.
pub const KEY_ENV: &str = "FWPKG_TEA_KEY";

/// Top-level command line.
#[derive(Debug, Parser)]
#[command(name = "fwpkg")]
#[command(author, version, about = "fwpkg - build firmware update packages")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a firmware update package
    Build(BuildArgs),
    /// Create a firmware definition template
    New {
        /// Vehicle model the definition is for
        model: String,
        /// Directory to save the definition in
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Validate a firmware definition without building
    Check {
        /// Firmware definition file to check
        path: PathBuf,
    },
    /// Compute MD5 digests of files (for manifest authoring)
    Md5 {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Arguments of `fwpkg build`.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Raw firmware image
    pub firmware: PathBuf,

    /// Firmware definition (TOML); flags below override its fields
    #[arg(short, long)]
    pub spec: Option<PathBuf>,

    /// Display name shown by the updater
    #[arg(short, long)]
    pub name: Option<String>,

    /// Vehicle model (1-10 alphanumeric characters)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Firmware type: DRV, BMS or BLE
    #[arg(short, long = "type")]
    pub type_flag: Option<String>,

    /// Compatible board, repeatable or comma-separated (replaces the definition's list)
    #[arg(short, long = "board", value_delimiter = ',')]
    pub boards: Vec<String>,

    /// Refuse to flash on model mismatch
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub enforce_model: Option<bool>,

    /// Encryption: plain, encrypted or both
    #[arg(short, long)]
    pub encryption: Option<String>,

    /// Manifest schema version
    #[arg(long)]
    pub schema_version: Option<i64>,

    /// Free-text parameters stored as params.txt
    #[arg(long, conflicts_with = "params_file")]
    pub params: Option<String>,

    /// Read params.txt contents from a file
    #[arg(long)]
    pub params_file: Option<PathBuf>,

    /// TEA key as 32 hex characters
    #[arg(long, env = KEY_ENV, hide_env_values = true)]
    pub key: Option<String>,

    /// Output archive path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Overwrite the output if it exists
    #[arg(short, long)]
    pub force: bool,
}
