//! Workbill CLI library.
//!
//! This crate provides the CLI interface for the work session billing
//! calculator.

mod cli;
pub mod commands;
mod config;
pub mod format;

pub use cli::{Cli, Commands, RatesAction};
pub use config::Config;
