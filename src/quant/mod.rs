//! Quant Cloud control-plane integration.
//!
//! This module provides the environments API client, the classification of
//! its failures, and the read-only existence probe.

use async_trait::async_trait;

use crate::error::ApiError;

mod classify;
mod client;
mod prober;
mod types;

pub use classify::classify;
pub use client::QuantClient;
pub use prober::{ExistenceProber, ProbeResult};
pub use types::{CreateEnvironmentRequest, Environment, UpdateEnvironmentRequest};

/// The environment RPCs of the control plane.
///
/// Errors are raw; callers classify them with [`classify`] before branching.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Fetches an environment.
    async fn get_environment(
        &self,
        organization: &str,
        application: &str,
        name: &str,
    ) -> Result<Environment, ApiError>;

    /// Creates an environment.
    async fn create_environment(
        &self,
        organization: &str,
        application: &str,
        request: &CreateEnvironmentRequest,
    ) -> Result<Environment, ApiError>;

    /// Updates an environment. The control plane may answer without a body.
    async fn update_environment(
        &self,
        organization: &str,
        application: &str,
        name: &str,
        request: &UpdateEnvironmentRequest,
    ) -> Result<Option<Environment>, ApiError>;

    /// Deletes an environment.
    async fn delete_environment(
        &self,
        organization: &str,
        application: &str,
        name: &str,
    ) -> Result<(), ApiError>;
}
