//! Parsing of raw input values.
//!
//! Inputs arrive as strings. This module turns them into typed values:
//! compose documents (inline JSON, or a JSON/YAML file), capacity bounds,
//! and the optional `.env` file.

use crate::error::{ConfigError, Result};
use std::path::Path;
use tracing::{debug, info};

use super::spec::DEFAULT_CAPACITY;

/// Parser for raw input values.
#[derive(Debug, Default)]
pub struct InputParser {
    /// Base path for resolving relative paths.
    base_path: Option<std::path::PathBuf>,
}

impl InputParser {
    /// Creates a new input parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Parses an inline JSON compose document.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid JSON.
    pub fn parse_compose_json(&self, content: &str) -> Result<serde_json::Value> {
        debug!("Parsing inline compose definition");

        serde_json::from_str(content).map_err(|e| {
            ConfigError::InvalidCompose {
                message: format!("JSON parse error: {e}"),
                location: Some(String::from("compose_spec")),
            }
            .into()
        })
    }

    /// Loads a compose document from a JSON or YAML file.
    ///
    /// Files ending in `.json` are parsed as JSON; anything else as YAML,
    /// which also accepts JSON content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_compose_file(&self, path: impl AsRef<Path>) -> Result<serde_json::Value> {
        let path = self.resolve(path.as_ref());
        info!("Loading compose definition from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound { path }.into());
        }

        let content = std::fs::read_to_string(&path)?;
        let location = Some(path.display().to_string());

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed: std::result::Result<serde_json::Value, ConfigError> = if is_json {
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidCompose {
                message: format!("JSON parse error: {e}"),
                location,
            })
        } else {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidCompose {
                message: format!("YAML parse error: {e}"),
                location,
            })
        };

        Ok(parsed?)
    }

    /// Parses a capacity bound, defaulting to 1 when absent.
    ///
    /// Only the base-10 syntax is checked; range is left to the control plane.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a base-10 integer.
    pub fn parse_capacity(&self, name: &str, value: Option<&str>) -> Result<i64> {
        let Some(raw) = value else {
            return Ok(DEFAULT_CAPACITY);
        };

        raw.trim().parse::<i64>().map_err(|e| {
            ConfigError::invalid(name, raw, format!("not a base-10 integer ({e})")).into()
        })
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self.resolve(Path::new(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| ConfigError::InvalidValue {
                name: String::from(".env"),
                value: env_path.display().to_string(),
                reason: e.to_string(),
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Resolves `path` against the base path when relative.
    fn resolve(&self, path: &Path) -> std::path::PathBuf {
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
