//! Command-line interface definitions.
//!
//! Defines the CLI structure for the rikiddo binary using `clap`. Every
//! subcommand opens a fresh market from a configuration file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dynamic-fee LMSR market maker
#[derive(Parser, Debug)]
#[command(name = "rikiddo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a configuration file and show the market it opens
    Check(ConfigPathArg),

    /// Quote a trade on a freshly opened market
    Quote(QuoteArgs),

    /// Apply a script of trades and liquidity events, then print the book
    Replay(ReplayArgs),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(long, short, default_value = "rikiddo.toml")]
    pub config: PathBuf,
}

/// Arguments for `rikiddo quote`.
#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// Path to configuration file
    #[arg(long, short, default_value = "rikiddo.toml")]
    pub config: PathBuf,

    /// Outcome index
    #[arg(long)]
    pub outcome: usize,

    /// Share delta; negative values quote a sale
    #[arg(long, allow_hyphen_values = true)]
    pub delta: f64,
}

/// Arguments for `rikiddo replay`.
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Path to configuration file
    #[arg(long, short, default_value = "rikiddo.toml")]
    pub config: PathBuf,

    /// Path to the operation script
    #[arg(long, short)]
    pub script: PathBuf,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,
}
