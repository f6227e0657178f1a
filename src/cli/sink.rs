//! Step outputs and workflow annotations.
//!
//! Inside GitHub Actions, outputs are appended to the file named by
//! `GITHUB_OUTPUT`. Elsewhere they are written to stdout as `name=value`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

use crate::error::{QuantError, Result};

/// Variable naming the step output file.
pub const GITHUB_OUTPUT_VAR: &str = "GITHUB_OUTPUT";

/// Name of the single output this tool sets.
pub const ENVIRONMENT_NAME_OUTPUT: &str = "environment_name";

/// Receiver for step outputs.
pub trait OutputSink {
    /// Records an output value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Sink appending to the `GITHUB_OUTPUT` file.
#[derive(Debug, Clone)]
pub struct GithubOutputFile {
    /// Path to the output file.
    path: PathBuf,
}

/// Sink writing `name=value` lines to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl GithubOutputFile {
    /// Creates a sink for the given output file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Formats one output entry, using the delimiter form for multi-line values.
fn format_entry(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{name}={value}\n")
    }
}

impl OutputSink for GithubOutputFile {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        debug!("Writing output {name} to {}", self.path.display());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| QuantError::Output {
                name: name.to_string(),
                message: format!("{}: {e}", self.path.display()),
            })?;

        file.write_all(format_entry(name, value).as_bytes())?;
        Ok(())
    }
}

impl OutputSink for StdoutSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(format_entry(name, value).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Returns the sink for the current process environment.
#[must_use]
pub fn default_sink() -> Box<dyn OutputSink> {
    match std::env::var_os(GITHUB_OUTPUT_VAR) {
        Some(path) if !path.is_empty() => Box::new(GithubOutputFile::new(path)),
        _ => Box::new(StdoutSink),
    }
}

/// Escapes a message for a workflow command.
fn escape_annotation(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Emits an `::error::` annotation when running under GitHub Actions.
pub fn annotate_failure(message: &str) {
    if std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "::error::{}", escape_annotation(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_appends_entries() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("output");
        std::fs::write(&path, "previous=1\n").expect("seed file");

        let mut sink = GithubOutputFile::new(&path);
        sink.set_output(ENVIRONMENT_NAME_OUTPUT, "staging")
            .expect("write output");

        let content = std::fs::read_to_string(&path).expect("read file");
        assert_eq!(content, "previous=1\nenvironment_name=staging\n");
    }

    #[test]
    fn test_multiline_value_uses_delimiter() {
        let entry = format_entry("summary", "line one\nline two");
        let mut lines = entry.lines();
        let header = lines.next().expect("header");
        let delimiter = header
            .strip_prefix("summary<<")
            .expect("delimiter form");
        assert_eq!(lines.next(), Some("line one"));
        assert_eq!(lines.next(), Some("line two"));
        assert_eq!(lines.next(), Some(delimiter));
    }

    #[test]
    fn test_annotation_escaping() {
        assert_eq!(escape_annotation("50% done\nnext"), "50%25 done%0Anext");
    }
}
