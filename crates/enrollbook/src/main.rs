//! `enrollbook` - CLI for the registration wizard
//!
//! This binary runs the two-step registration wizard and shows stored
//! registrations.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};

use enrollbook::cli::{wizard, Cli, Command, ConfigCommand, DbCommand, RegisterCommand, ShowCommand};
use enrollbook::storage::migrations::CURRENT_VERSION;
use enrollbook::{image_codec, init_logging, render_text, Config, DisplayOptions, Error};
use enrollbook::{RecordStore, RegistrationView};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<Error>() {
                // Wizard messages are meant for the user as-is
                Some(e) if e.is_validation() => eprintln!("{e}"),
                _ => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Register(cmd) => handle_register(&config, &cmd),
        Command::Show(cmd) => handle_show(&config, &cmd),
        Command::Db(cmd) => handle_db(&config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<RecordStore> {
    let path = config.database_path();
    RecordStore::open_at(&path).with_context(|| format!("opening store at {}", path.display()))
}

fn handle_register(config: &Config, cmd: &RegisterCommand) -> anyhow::Result<ExitCode> {
    let store = open_store(config)?;

    let draft = if cmd.no_input {
        wizard::from_flags(cmd, &config.registration)?
    } else if let Some(draft) = wizard::run_interactive(cmd, &config.registration)? {
        draft
    } else {
        eprintln!("Registration cancelled.");
        return Ok(ExitCode::FAILURE);
    };

    let profile = draft.to_profile()?;
    let photo = match draft.photo_path() {
        Some(path) => Some(
            image_codec::load(path)
                .with_context(|| format!("reading photo {}", path.display()))?,
        ),
        None => None,
    };
    debug!("Submitting registration for {}", profile.full_name());

    let id = store.register(&profile, photo.as_ref())?;
    println!("Registered user #{id}");
    Ok(ExitCode::SUCCESS)
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<ExitCode> {
    let store = open_store(config)?;

    let registration = match cmd.id {
        Some(id) => store.get(id)?,
        None => match store.fetch_latest_profile() {
            Ok(registration) => Some(registration),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        },
    };

    let Some(registration) = registration else {
        match cmd.id {
            Some(id) => eprintln!("No registration with id {id}."),
            None => eprintln!("No registrations yet."),
        }
        return Ok(ExitCode::FAILURE);
    };

    let mut options = DisplayOptions::from(&config.display);
    if cmd.show_password {
        options.mask_password = false;
    }

    if cmd.json {
        let view = RegistrationView::new(&registration, &options);
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_text(&registration, &options));
    }

    if let Some(target) = &cmd.export_photo {
        match &registration.photo {
            Some(photo) => {
                image_codec::save_png(photo, target)?;
                eprintln!("Photo written to {}", target.display());
            }
            None => warn!("Registration #{} has no photo to export", registration.id()),
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn handle_db(config: &Config, cmd: DbCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        DbCommand::Migrate { yes } => {
            if !yes {
                println!("This will delete every stored registration.");
                println!("Use --yes to confirm.");
                return Ok(ExitCode::FAILURE);
            }
            let store = open_store(config)?;
            store.migrate(CURRENT_VERSION, CURRENT_VERSION)?;
            println!("Database rebuilt at schema version {CURRENT_VERSION}.");
        }
        DbCommand::Status { json } => {
            let store = open_store(config)?;
            let version = store.schema_version()?;
            let count = store.count()?;

            if json {
                let status = serde_json::json!({
                    "database_path": store.path(),
                    "schema_version": version,
                    "registrations": count,
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("enrollbook status");
                println!("-----------------");
                println!("Database:       {}", store.path().display());
                println!("Schema version: {version}");
                println!("Registrations:  {count}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Display]");
                println!("  Mask password:      {}", config.display.mask_password);
                println!(
                    "  Photo dimensions:   {}",
                    config.display.show_photo_dimensions
                );
                println!();
                println!("[Registration]");
                println!("  Require photo:      {}", config.registration.require_photo);
                println!(
                    "  Default country:    {}",
                    config
                        .registration
                        .default_country
                        .as_deref()
                        .unwrap_or("(none)")
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            if let Err(e) = Config::load_from(Some(path)) {
                eprintln!("Configuration error: {e}");
                return Ok(ExitCode::FAILURE);
            }
            println!("Configuration is valid.");
        }
    }
    Ok(ExitCode::SUCCESS)
}
