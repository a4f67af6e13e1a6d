//! Command-line driver.
//!
//! Each subcommand loads a configuration, opens a market from it, and works
//! against that market only. Nothing is persisted between runs.

pub mod check;
pub mod command;
pub mod output;
pub mod quote;
pub mod replay;

pub use command::{Cli, Commands};

use crate::error::Result;

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check(args) => check::execute(&args.config),
        Commands::Quote(args) => quote::execute(&args),
        Commands::Replay(args) => replay::execute(&args),
    }
}
