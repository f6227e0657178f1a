//! Output formatting for CLI commands.
//!
//! This module renders run summaries for people (colored text and tables)
//! and for scripts (JSON).

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::EnvironmentSpec;
use crate::quant::ProbeResult;
use crate::reconciler::ReconciliationResult;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Field row for environment tables.
#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// JSON summary of a reconciliation.
#[derive(Serialize)]
struct ReconciliationJson<'a> {
    organization: &'a str,
    application: &'a str,
    operation: String,
    #[serde(flatten)]
    result: &'a ReconciliationResult,
    finished_at: DateTime<Utc>,
}

/// JSON summary of a probe.
#[derive(Serialize)]
struct ProbeJson<'a> {
    organization: &'a str,
    application: &'a str,
    environment_name: &'a str,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<&'a crate::quant::Environment>,
    checked_at: DateTime<Utc>,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of a reconciliation run.
    #[must_use]
    pub fn format_result(&self, spec: &EnvironmentSpec, result: &ReconciliationResult) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&ReconciliationJson {
                organization: &spec.organization,
                application: &spec.application,
                operation: spec.operation.to_string(),
                result,
                finished_at: Utc::now(),
            })
            .unwrap_or_default(),
            OutputFormat::Text => match result {
                ReconciliationResult::Success { environment_name } => format!(
                    "{} Environment {} reconciled ({} in {}/{})\n",
                    "✓".green(),
                    environment_name.bold(),
                    spec.operation,
                    spec.organization,
                    spec.application
                ),
                ReconciliationResult::Failure { message } => format!(
                    "{} Failed to {} environment {}: {message}\n",
                    "✗".red(),
                    spec.operation,
                    spec.name.bold()
                ),
            },
        }
    }

    /// Formats the result of a probe.
    #[must_use]
    pub fn format_probe(&self, spec: &EnvironmentSpec, probe: &ProbeResult) -> String {
        match self.format {
            OutputFormat::Json => {
                let environment = match probe {
                    ProbeResult::Present(env) => Some(env.as_ref()),
                    ProbeResult::Absent => None,
                };
                serde_json::to_string_pretty(&ProbeJson {
                    organization: &spec.organization,
                    application: &spec.application,
                    environment_name: &spec.name,
                    exists: probe.is_present(),
                    environment,
                    checked_at: Utc::now(),
                })
                .unwrap_or_default()
            }
            OutputFormat::Text => Self::format_probe_text(spec, probe),
        }
    }

    /// Formats a probe as text.
    fn format_probe_text(spec: &EnvironmentSpec, probe: &ProbeResult) -> String {
        let ProbeResult::Present(env) = probe else {
            return format!(
                "{} Environment {} does not exist in {}/{}\n",
                "-".yellow(),
                spec.name.bold(),
                spec.organization,
                spec.application
            );
        };

        let mut output = String::new();
        let _ = writeln!(
            output,
            "{} Environment {} exists in {}/{}\n",
            "✓".green(),
            spec.name.bold(),
            spec.organization,
            spec.application
        );

        let containers = env
            .compose_definition
            .as_ref()
            .and_then(|c| c.get("containers"))
            .and_then(serde_json::Value::as_array)
            .map_or(0, Vec::len);

        let rows = vec![
            FieldRow {
                field: "Name",
                value: env.env_name.clone(),
            },
            FieldRow {
                field: "Status",
                value: env.status.clone().unwrap_or_else(|| String::from("unknown")),
            },
            FieldRow {
                field: "Capacity",
                value: format!(
                    "{}-{}",
                    Self::format_bound(env.min_capacity),
                    Self::format_bound(env.max_capacity)
                ),
            },
            FieldRow {
                field: "Containers",
                value: containers.to_string(),
            },
        ];

        output.push_str(&Table::new(rows).to_string());
        output.push('\n');
        output
    }

    /// Formats an optional capacity bound.
    fn format_bound(bound: Option<i64>) -> String {
        bound.map_or_else(|| String::from("?"), |b| b.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quant::Environment;
    use serde_json::json;

    fn spec() -> EnvironmentSpec {
        EnvironmentSpec::new("acme", "shop", "staging")
    }

    #[test]
    fn test_result_json() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let result = ReconciliationResult::Success {
            environment_name: String::from("staging"),
        };
        let output = formatter.format_result(&spec(), &result);
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(value["status"], "success");
        assert_eq!(value["environment_name"], "staging");
        assert_eq!(value["operation"], "create");
        assert!(value.get("finished_at").is_some());
    }

    #[test]
    fn test_failure_text_contains_message() {
        let formatter = OutputFormatter::new(OutputFormat::Text);
        let result = ReconciliationResult::Failure {
            message: String::from("Quota exceeded"),
        };
        assert!(formatter.format_result(&spec(), &result).contains("Quota exceeded"));
    }

    #[test]
    fn test_probe_text_table() {
        let formatter = OutputFormatter::new(OutputFormat::Text);
        let probe = ProbeResult::Present(Box::new(Environment {
            env_name: String::from("staging"),
            compose_definition: Some(json!({ "containers": [{ "name": "web" }] })),
            min_capacity: Some(1),
            max_capacity: Some(3),
            status: Some(String::from("running")),
        }));
        let output = formatter.format_probe(&spec(), &probe);
        assert!(output.contains("1-3"));
        assert!(output.contains("running"));
    }

    #[test]
    fn test_probe_json_absent() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_probe(&spec(), &ProbeResult::Absent);
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["exists"], false);
        assert!(value.get("environment").is_none());
    }
}
