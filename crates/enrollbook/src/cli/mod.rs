//! Command-line interface for enrollbook.
//!
//! This module provides the CLI structure and the registration wizard for
//! the `enrollbook` binary.

mod commands;
pub mod wizard;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, DbCommand, GenderArg, RegisterCommand, ShowCommand};

use crate::logging::Verbosity;

/// enrollbook - Register people and look them up again
///
/// A two-step registration wizard that stores each person's details and photo
/// in a local `SQLite` database.
#[derive(Debug, Parser)]
#[command(name = "enrollbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the registration wizard
    Register(RegisterCommand),

    /// Show the latest registration
    Show(ShowCommand),

    /// Database maintenance
    #[command(subcommand)]
    Db(DbCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
