//! CLI command definitions and dispatch for the `pforge` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb
//! pattern (e.g., `pforge serve`, `pforge score`).

pub mod score;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Review and ship AI pair-programming output.
#[derive(Parser)]
#[command(name = "pforge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Bridge tracing spans to OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a local file with the completeness validator.
    Score {
        /// Path of the file to score.
        path: PathBuf,

        /// TOML file overriding the configured validation policy.
        #[arg(long)]
        policy: Option<PathBuf>,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
