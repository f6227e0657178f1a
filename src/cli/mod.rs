//! CLI module for the environment reconciler.
//!
//! This module provides the command-line interface, run summaries, and the
//! step-output sink.

mod commands;
mod output;
mod sink;

pub use commands::{Cli, Commands, LogFormat, OutputFormat};
pub use output::OutputFormatter;
pub use sink::{
    annotate_failure, default_sink, ENVIRONMENT_NAME_OUTPUT, GITHUB_OUTPUT_VAR, GithubOutputFile,
    OutputSink, StdoutSink,
};
