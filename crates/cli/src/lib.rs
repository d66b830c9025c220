//! `clap`-derived command line surface for the `openx` binary.
//!
//! Three subcommands. This is ambient process plumbing around the
//! matching engine, not part of its core contract.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "openx")]
#[command(about = "OpenExchange - a continuous double-auction order matching engine")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the matching engine and its HTTP adapter
    Start {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Override the HTTP bind port from the configuration file
        #[arg(long)]
        http: Option<u16>,
    },

    /// Validate a configuration file without starting the engine
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,
    },

    /// Write a new configuration file populated with defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
