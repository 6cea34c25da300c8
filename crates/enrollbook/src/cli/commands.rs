//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::profile::Gender;

/// Register command arguments.
///
/// Any field given on the command line pre-fills the wizard. With
/// `--no-input` nothing is prompted and missing fields fail validation.
#[derive(Debug, Default, Args)]
pub struct RegisterCommand {
    /// Never prompt; take every field from flags
    #[arg(long)]
    pub no_input: bool,

    /// First name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Password (stored in plain text)
    #[arg(long)]
    pub password: Option<String>,

    /// Date of birth (e.g. "2000-01-31" or "31 January, 2000")
    #[arg(long)]
    pub dob: Option<String>,

    /// Gender
    #[arg(long, value_enum)]
    pub gender: Option<GenderArg>,

    /// Location (town, street)
    #[arg(long)]
    pub location: Option<String>,

    /// Postal or PIN code
    #[arg(long)]
    pub postal_code: Option<String>,

    /// State or province
    #[arg(long)]
    pub state: Option<String>,

    /// Country
    #[arg(long)]
    pub country: Option<String>,

    /// Photo file to attach
    #[arg(long, value_name = "FILE")]
    pub photo: Option<PathBuf>,

    /// Agree to the terms and conditions
    #[arg(long)]
    pub agree: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Show a specific registration instead of the latest
    #[arg(long)]
    pub id: Option<i64>,

    /// Print the password in clear text
    #[arg(long)]
    pub show_password: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Write the stored photo to this file as PNG
    #[arg(long, value_name = "FILE")]
    pub export_photo: Option<PathBuf>,
}

/// Database maintenance commands.
#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Drop and recreate the registration tables (deletes every registration)
    Migrate {
        /// Confirm the data loss
        #[arg(short, long)]
        yes: bool,
    },

    /// Show database location, schema version and row count
    Status {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Gender argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    /// Male
    Male,
    /// Female
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Self::Male,
            GenderArg::Female => Self::Female,
        }
    }
}
