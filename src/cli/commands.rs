//! CLI command definitions.
//!
//! This module defines the command line using clap. Every input can also be
//! supplied through its `INPUT_*` variable, which is how a GitHub Actions
//! runner passes `with:` values.

use clap::{Parser, Subcommand};

use crate::config::ActionInputs;

/// quant-env - Declarative Quant Cloud environment reconciler.
#[derive(Parser, Debug)]
#[command(name = "quant-env")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Log format (text, json).
    #[arg(long, global = true, default_value = "text", env = "QUANT_ENV_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Transport timeout for each API call, in seconds.
    #[arg(long, global = true, env = "INPUT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Action inputs.
    #[command(flatten)]
    pub inputs: ActionInputs,

    /// Subcommand to execute (defaults to `reconcile`).
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Create, update or delete the environment as requested.
    Reconcile,

    /// Report whether the environment exists, without changing it.
    Probe,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// Log format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable log lines.
    #[default]
    Text,
    /// One JSON object per log line.
    Json,
}

impl Cli {
    /// Returns the command to run.
    #[must_use]
    pub fn selected_command(&self) -> Commands {
        self.command.unwrap_or(Commands::Reconcile)
    }
}
