//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Work session billing calculator.
///
/// Records a session's start/stop instants and a travel distance, then
/// computes a billed total from configurable hourly and travel rates.
#[derive(Debug, Parser)]
#[command(name = "wb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a work session.
    Start,

    /// Stop the running work session and show the billed total.
    Stop,

    /// Discard the current session and its distance.
    Reset,

    /// Set the travel distance for the current session.
    Distance {
        /// Distance in kilometers.
        km: f64,
    },

    /// Inspect or update the billing rates.
    Rates {
        #[command(subcommand)]
        action: RatesAction,
    },

    /// Show the current session and rate configuration.
    Status,

    /// Show the itemized cost breakdown and billed total.
    Total {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Rate configuration actions.
#[derive(Debug, Subcommand)]
pub enum RatesAction {
    /// Show the persisted rates.
    Show {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Update one or more rates.
    Set {
        /// Hourly labour rate in currency units.
        #[arg(long)]
        hourly: Option<f64>,

        /// Travel rate in currency units per kilometer.
        #[arg(long)]
        travel: Option<f64>,

        /// Whether the flat standard fee is charged.
        #[arg(long)]
        standard_fee: Option<bool>,
    },
}
