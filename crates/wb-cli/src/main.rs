use std::io::stdout;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wb_cli::commands::{distance, rates, reset, start, status, stop, total};
use wb_cli::{Cli, Commands, Config, RatesAction};

/// Load config and open the database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(wb_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = wb_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Start) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            start::run(&mut stdout(), &db, Utc::now())?;
        }
        Some(Commands::Stop) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            stop::run(&mut stdout(), &db, Utc::now(), &config.currency)?;
        }
        Some(Commands::Reset) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            reset::run(&mut stdout(), &db)?;
        }
        Some(Commands::Distance { km }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            distance::run(&mut stdout(), &db, *km)?;
        }
        Some(Commands::Rates { action }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            match action {
                RatesAction::Show { json } => {
                    rates::show(&mut stdout(), &db, *json, &config.currency)?;
                }
                RatesAction::Set {
                    hourly,
                    travel,
                    standard_fee,
                } => {
                    rates::set(
                        &mut stdout(),
                        &db,
                        *hourly,
                        *travel,
                        *standard_fee,
                        &config.currency,
                    )?;
                }
            }
        }
        Some(Commands::Status) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            status::run(&mut stdout(), &db, &config)?;
        }
        Some(Commands::Total { json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            total::run(&mut stdout(), &db, *json, &config.currency)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
