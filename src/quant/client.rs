//! Quant Cloud API client implementation.
//!
//! This module provides the HTTP client for the environments endpoints of
//! the Quant Cloud REST API.

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Url};
use serde::Deserialize;
use tracing::{debug, info, trace};

use crate::config::ClientConfig;
use crate::error::ApiError;

use super::types::{CreateEnvironmentRequest, Environment, UpdateEnvironmentRequest};
use super::ControlPlane;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("quant-env/", env!("CARGO_PKG_VERSION"));

/// Quant Cloud API client.
#[derive(Debug, Clone)]
pub struct QuantClient {
    /// HTTP client.
    client: Client,
    /// Endpoint and credentials.
    config: ClientConfig,
    /// Parsed base URL.
    base_url: Url,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl QuantClient {
    /// Creates a new Quant Cloud API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be created.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidRequest {
            message: format!("Invalid base URL '{}': {e}", config.base_url),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest {
                message: format!("Invalid base URL '{}'", config.base_url),
            });
        }

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Builds the URL of the environments collection, or of one environment.
    fn environments_url(&self, organization: &str, application: &str, name: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "organizations",
                organization,
                "applications",
                application,
                "environments",
            ]);
            if let Some(name) = name {
                segments.push(name);
            }
        }
        url
    }

    /// Attaches the bearer credential and common headers.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        trace!("{method} {url}");
        self.client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.config.api_key)
    }

    /// Sends a request and returns the response body.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            debug!("Quant Cloud API returned {status}: {body}");
            return Err(ApiError::http(status.as_u16(), error_message(&body)));
        }

        Ok(body)
    }

    /// Decodes an environment body.
    fn decode(body: &str) -> Result<Environment, ApiError> {
        serde_json::from_str(body)
            .map_err(|e| ApiError::invalid_response(format!("Failed to parse response: {e}")))
    }
}

/// Extracts the remote message from an error body.
///
/// JSON bodies contribute their `message` or `error` field; any other
/// non-blank body is used as-is.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty()),
        Err(_) => Some(body.to_string()),
    }
}

#[async_trait]
impl ControlPlane for QuantClient {
    async fn get_environment(
        &self,
        organization: &str,
        application: &str,
        name: &str,
    ) -> Result<Environment, ApiError> {
        let url = self.environments_url(organization, application, Some(name));
        let body = self.send(self.request(Method::GET, url)).await?;
        Self::decode(&body)
    }

    async fn create_environment(
        &self,
        organization: &str,
        application: &str,
        request: &CreateEnvironmentRequest,
    ) -> Result<Environment, ApiError> {
        let url = self.environments_url(organization, application, None);
        let payload = request.payload()?;
        info!("Creating environment {}", request.env_name);
        debug!("Create payload: {payload}");

        let body = self
            .send(self.request(Method::POST, url).json(&payload))
            .await?;
        Self::decode(&body)
    }

    async fn update_environment(
        &self,
        organization: &str,
        application: &str,
        name: &str,
        request: &UpdateEnvironmentRequest,
    ) -> Result<Option<Environment>, ApiError> {
        let url = self.environments_url(organization, application, Some(name));
        let payload = request.payload()?;
        info!("Updating environment {name}");
        debug!("Update payload: {payload}");

        let body = self
            .send(self.request(Method::PUT, url).json(&payload))
            .await?;

        if body.trim().is_empty() {
            return Ok(None);
        }
        Self::decode(&body).map(Some)
    }

    async fn delete_environment(
        &self,
        organization: &str,
        application: &str,
        name: &str,
    ) -> Result<(), ApiError> {
        let url = self.environments_url(organization, application, Some(name));
        info!("Deleting environment {name}");

        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENV_PATH: &str = "/organizations/acme/applications/shop/environments/staging";
    const COLLECTION_PATH: &str = "/organizations/acme/applications/shop/environments";

    fn client_for(server: &MockServer) -> QuantClient {
        QuantClient::new(ClientConfig::new(server.uri(), "secret-key")).expect("valid config")
    }

    #[test]
    fn test_environment_url_keeps_base_path() {
        let client = QuantClient::new(ClientConfig::new(
            "https://dashboard.quantcdn.io/api/v3/",
            "k",
        ))
        .expect("valid config");
        let url = client.environments_url("acme", "shop", Some("pr 42"));
        assert_eq!(
            url.as_str(),
            "https://dashboard.quantcdn.io/api/v3/organizations/acme/applications/shop/environments/pr%2042"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(QuantClient::new(ClientConfig::new("not a url", "k")).is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"Quota exceeded"}"#).as_deref(),
            Some("Quota exceeded")
        );
        assert_eq!(
            error_message(r#"{"error":"Bad compose"}"#).as_deref(),
            Some("Bad compose")
        );
        assert_eq!(error_message("Gateway timeout").as_deref(), Some("Gateway timeout"));
        assert_eq!(error_message("  "), None);
        assert_eq!(error_message(r#"{"code":7}"#), None);
    }

    #[tokio::test]
    async fn test_get_environment_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ENV_PATH))
            .and(header("authorization", "Bearer secret-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "envName": "staging",
                "minCapacity": 1,
                "maxCapacity": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let env = client_for(&server)
            .get_environment("acme", "shop", "staging")
            .await
            .expect("environment");
        assert_eq!(env.env_name, "staging");
        assert_eq!(env.max_capacity, Some(2));
    }

    #[tokio::test]
    async fn test_get_environment_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ENV_PATH))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "Environment not found" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_environment("acme", "shop", "staging")
            .await
            .expect_err("not found");
        assert!(matches!(
            err,
            ApiError::Http { status: 404, ref message } if message.as_deref() == Some("Environment not found")
        ));
    }

    #[tokio::test]
    async fn test_create_environment_sends_sanitized_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COLLECTION_PATH))
            .and(body_json(json!({
                "envName": "staging",
                "minCapacity": 1,
                "maxCapacity": 1,
                "composeDefinition": { "containers": [{ "name": "web", "imageReference": "img:1" }] }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "envName": "staging" })))
            .expect(1)
            .mount(&server)
            .await;

        let request = CreateEnvironmentRequest {
            env_name: String::from("staging"),
            min_capacity: 1,
            max_capacity: 1,
            compose_definition: Some(json!({
                "containers": [{ "name": "web", "imageReference": "img:1", "command": null }]
            })),
            clone_configuration_from: None,
            image_suffix: None,
        };

        let env = client_for(&server)
            .create_environment("acme", "shop", &request)
            .await
            .expect("created");
        assert_eq!(env.env_name, "staging");
    }

    #[tokio::test]
    async fn test_update_environment_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(ENV_PATH))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let request = UpdateEnvironmentRequest {
            compose_definition: json!({ "containers": [] }),
            min_capacity: 1,
            max_capacity: 1,
            image_suffix: None,
        };

        let result = client_for(&server)
            .update_environment("acme", "shop", "staging", &request)
            .await
            .expect("updated");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_environment_surfaces_remote_message() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(ENV_PATH))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "message": "Invalid compose" })),
            )
            .mount(&server)
            .await;

        let request = UpdateEnvironmentRequest {
            compose_definition: json!({ "containers": [] }),
            min_capacity: 1,
            max_capacity: 1,
            image_suffix: None,
        };

        let err = client_for(&server)
            .update_environment("acme", "shop", "staging", &request)
            .await
            .expect_err("rejected");
        assert_eq!(err.to_string(), "Quant Cloud API request failed with status 422: Invalid compose");
    }

    #[tokio::test]
    async fn test_delete_environment() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(ENV_PATH))
            .and(header("authorization", "Bearer secret-key"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .delete_environment("acme", "shop", "staging")
            .await
            .expect("deleted");
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ENV_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_environment("acme", "shop", "staging")
            .await
            .expect_err("malformed");
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }
}
