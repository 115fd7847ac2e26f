//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Docseed using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Docseed - JSON collection export importer for Firestore
#[derive(Parser, Debug)]
#[command(name = "docseed")]
#[command(version, about, long_about = None)]
#[command(author = "Docseed Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "docseed.toml", env = "DOCSEED_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DOCSEED_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import collection export files into the configured store
    Import(commands::import::ImportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
