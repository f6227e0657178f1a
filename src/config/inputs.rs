//! Action inputs.
//!
//! Every input is a CLI flag backed by the `INPUT_<NAME>` environment
//! variable a GitHub Actions runner sets for each `with:` entry. Runners set
//! unused optional inputs to the empty string, so empty values are treated
//! as absent.

use clap::Args;
use std::time::Duration;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::parser::InputParser;
use super::spec::{ClientConfig, CreateMode, DEFAULT_BASE_URL, EnvironmentSpec, Operation};
use super::validator::SpecValidator;

/// Raw inputs for one reconciliation.
#[derive(Args, Debug, Clone, Default)]
pub struct ActionInputs {
    /// Quant Cloud API key.
    #[arg(long, env = "INPUT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Application name.
    #[arg(long, env = "INPUT_APP_NAME")]
    pub app_name: Option<String>,

    /// Organization machine name.
    #[arg(long, env = "INPUT_ORGANIZATION")]
    pub organization: Option<String>,

    /// Environment name.
    #[arg(long, env = "INPUT_ENVIRONMENT_NAME")]
    pub environment_name: Option<String>,

    /// Quant Cloud API endpoint.
    #[arg(long, env = "INPUT_BASE_URL")]
    pub base_url: Option<String>,

    /// Environment to clone configuration from when creating.
    #[arg(long, env = "INPUT_FROM_ENVIRONMENT")]
    pub from_environment: Option<String>,

    /// JSON-encoded compose definition.
    #[arg(long, env = "INPUT_COMPOSE_SPEC")]
    pub compose_spec: Option<String>,

    /// Path to a JSON or YAML compose definition.
    #[arg(long, env = "INPUT_COMPOSE_FILE")]
    pub compose_file: Option<String>,

    /// Suffix appended to image tags.
    #[arg(long, env = "INPUT_IMAGE_SUFFIX")]
    pub image_suffix: Option<String>,

    /// Minimum capacity (default 1).
    #[arg(long, env = "INPUT_MIN_CAPACITY")]
    pub min_capacity: Option<String>,

    /// Maximum capacity (default 1).
    #[arg(long, env = "INPUT_MAX_CAPACITY")]
    pub max_capacity: Option<String>,

    /// Operation: create, update or delete (default create).
    #[arg(long, env = "INPUT_OPERATION")]
    pub operation: Option<String>,

    /// Create mode: upsert or strict (default upsert).
    #[arg(long, env = "INPUT_CREATE_MODE")]
    pub create_mode: Option<String>,
}

/// Returns the trimmed value, or `None` when absent or blank.
fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Returns the value of a required input.
fn required<'a>(name: &str, value: Option<&'a String>) -> Result<&'a str> {
    non_empty(value).ok_or_else(|| ConfigError::missing(name).into())
}

impl ActionInputs {
    /// Resolves the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing.
    pub fn client_config(&self, timeout: Option<Duration>) -> Result<ClientConfig> {
        let api_key = required("api_key", self.api_key.as_ref())?;
        let base_url = non_empty(self.base_url.as_ref()).unwrap_or(DEFAULT_BASE_URL);

        let config = ClientConfig::new(base_url, api_key);
        Ok(match timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        })
    }

    /// Resolves and validates the environment spec.
    ///
    /// # Errors
    ///
    /// Returns an error if a required input is missing or a value is invalid.
    pub fn environment_spec(&self, parser: &InputParser) -> Result<EnvironmentSpec> {
        let organization = required("organization", self.organization.as_ref())?;
        let application = required("app_name", self.app_name.as_ref())?;
        let name = required("environment_name", self.environment_name.as_ref())?;

        let operation = non_empty(self.operation.as_ref())
            .map(str::parse::<Operation>)
            .transpose()?
            .unwrap_or_default();
        let create_mode = non_empty(self.create_mode.as_ref())
            .map(str::parse::<CreateMode>)
            .transpose()?
            .unwrap_or_default();

        let compose = match (
            non_empty(self.compose_spec.as_ref()),
            non_empty(self.compose_file.as_ref()),
        ) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingInputs {
                    first: String::from("compose_spec"),
                    second: String::from("compose_file"),
                }
                .into());
            }
            (Some(inline), None) => Some(parser.parse_compose_json(inline)?),
            (None, Some(path)) => Some(parser.load_compose_file(path)?),
            (None, None) => None,
        };

        let spec = EnvironmentSpec {
            organization: organization.to_string(),
            application: application.to_string(),
            name: name.to_string(),
            compose,
            clone_from: non_empty(self.from_environment.as_ref()).map(String::from),
            min_capacity: parser.parse_capacity("min_capacity", non_empty(self.min_capacity.as_ref()))?,
            max_capacity: parser.parse_capacity("max_capacity", non_empty(self.max_capacity.as_ref()))?,
            image_suffix: non_empty(self.image_suffix.as_ref()).map(String::from),
            operation,
            create_mode,
        };

        SpecValidator::new().validate(&spec)?;

        debug!(
            "Resolved spec for {}/{}/{} (operation: {})",
            spec.organization, spec.application, spec.name, spec.operation
        );

        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuantError;
    use serde_json::json;

    fn base_inputs() -> ActionInputs {
        ActionInputs {
            api_key: Some(String::from("secret")),
            app_name: Some(String::from("shop")),
            organization: Some(String::from("acme")),
            environment_name: Some(String::from("staging")),
            ..ActionInputs::default()
        }
    }

    #[test]
    fn test_defaults() {
        let spec = base_inputs()
            .environment_spec(&InputParser::new())
            .expect("valid inputs");

        assert_eq!(spec.name, "staging");
        assert_eq!(spec.min_capacity, 1);
        assert_eq!(spec.max_capacity, 1);
        assert_eq!(spec.operation, Operation::Create);
        assert_eq!(spec.create_mode, CreateMode::Upsert);
        assert!(spec.compose.is_none());
    }

    #[test]
    fn test_blank_inputs_are_absent() {
        let inputs = ActionInputs {
            from_environment: Some(String::new()),
            compose_spec: Some(String::from("   ")),
            min_capacity: Some(String::new()),
            operation: Some(String::new()),
            base_url: Some(String::new()),
            ..base_inputs()
        };

        let spec = inputs.environment_spec(&InputParser::new()).expect("valid");
        assert!(spec.clone_from.is_none());
        assert!(spec.compose.is_none());
        assert_eq!(spec.min_capacity, 1);

        let config = inputs.client_config(None).expect("valid");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_required_input() {
        let inputs = ActionInputs {
            environment_name: Some(String::new()),
            ..base_inputs()
        };
        let result = inputs.environment_spec(&InputParser::new());
        assert!(matches!(
            result,
            Err(QuantError::Config(ConfigError::MissingInput { ref name })) if name == "environment_name"
        ));
    }

    #[test]
    fn test_missing_api_key() {
        let inputs = ActionInputs {
            api_key: None,
            ..base_inputs()
        };
        assert!(inputs.client_config(None).is_err());
    }

    #[test]
    fn test_full_inputs() {
        let inputs = ActionInputs {
            compose_spec: Some(String::from(
                r#"{"containers":[{"name":"web","imageReference":"img:1"}]}"#,
            )),
            from_environment: Some(String::from("production")),
            image_suffix: Some(String::from("-pr-42")),
            min_capacity: Some(String::from("2")),
            max_capacity: Some(String::from("6")),
            operation: Some(String::from("Update")),
            create_mode: Some(String::from("strict")),
            base_url: Some(String::from("https://example.test/api/v3")),
            ..base_inputs()
        };

        let spec = inputs.environment_spec(&InputParser::new()).expect("valid");
        assert_eq!(
            spec.compose,
            Some(json!({ "containers": [{ "name": "web", "imageReference": "img:1" }] }))
        );
        assert_eq!(spec.clone_from.as_deref(), Some("production"));
        assert_eq!(spec.image_suffix.as_deref(), Some("-pr-42"));
        assert_eq!((spec.min_capacity, spec.max_capacity), (2, 6));
        assert_eq!(spec.operation, Operation::Update);
        assert_eq!(spec.create_mode, CreateMode::Strict);

        let config = inputs
            .client_config(Some(Duration::from_secs(10)))
            .expect("valid");
        assert_eq!(config.base_url, "https://example.test/api/v3");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_invalid_operation() {
        let inputs = ActionInputs {
            operation: Some(String::from("upsert")),
            ..base_inputs()
        };
        assert!(inputs.environment_spec(&InputParser::new()).is_err());
    }

    #[test]
    fn test_invalid_capacity() {
        let inputs = ActionInputs {
            max_capacity: Some(String::from("lots")),
            ..base_inputs()
        };
        assert!(inputs.environment_spec(&InputParser::new()).is_err());
    }

    #[test]
    fn test_compose_spec_and_file_conflict() {
        let inputs = ActionInputs {
            compose_spec: Some(String::from("{}")),
            compose_file: Some(String::from("compose.yaml")),
            ..base_inputs()
        };
        let result = inputs.environment_spec(&InputParser::new());
        assert!(matches!(
            result,
            Err(QuantError::Config(ConfigError::ConflictingInputs { .. }))
        ));
    }
}
