//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for vendor-enrich using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Exit code: run completed without errors
pub const EXIT_OK: i32 = 0;
/// Exit code: run completed but some lookups or upserts failed
pub const EXIT_COMPLETED_WITH_ERRORS: i32 = 1;
/// Exit code: configuration could not be loaded or is invalid
pub const EXIT_CONFIG: i32 = 2;
/// Exit code: input file unreadable or malformed
pub const EXIT_INPUT: i32 = 3;
/// Exit code: the company dataset could not be loaded or saved
pub const EXIT_PERSISTENCE: i32 = 4;
/// Exit code: anything else
pub const EXIT_FATAL: i32 = 5;

/// vendor-enrich - vendor identity enrichment from public company registries
#[derive(Parser, Debug)]
#[command(name = "vendor-enrich")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "vendor-enrich.toml",
        env = "VENDOR_ENRICH_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VENDOR_ENRICH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enrich a vendor list and update the company dataset
    Enrich(commands::enrich::EnrichArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show company dataset statistics
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
