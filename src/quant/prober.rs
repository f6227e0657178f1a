//! Existence probe for environments.
//!
//! The probe is the single read-only call made before a create or update
//! decision.

use tracing::{debug, info};

use crate::error::ClassifiedError;

use super::classify::classify;
use super::types::Environment;
use super::ControlPlane;

/// Outcome of an existence probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    /// The environment exists.
    Present(Box<Environment>),
    /// The environment does not exist.
    Absent,
}

impl ProbeResult {
    /// Returns true if the environment exists.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// Existence prober backed by a control-plane client.
#[derive(Debug)]
pub struct ExistenceProber<'a, C: ?Sized> {
    /// Control-plane client.
    client: &'a C,
}

impl<'a, C: ControlPlane + ?Sized> ExistenceProber<'a, C> {
    /// Creates a new prober.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Looks up an environment.
    ///
    /// # Errors
    ///
    /// Returns the classified failure for anything other than not-found.
    pub async fn probe(
        &self,
        organization: &str,
        application: &str,
        name: &str,
    ) -> Result<ProbeResult, ClassifiedError> {
        info!("Probing environment {organization}/{application}/{name}");

        match self
            .client
            .get_environment(organization, application, name)
            .await
        {
            Ok(environment) => {
                debug!("Environment {name} exists");
                Ok(ProbeResult::Present(Box::new(environment)))
            }
            Err(err) => match classify(&err) {
                ClassifiedError::NotFound { .. } => {
                    debug!("Environment {name} does not exist");
                    Ok(ProbeResult::Absent)
                }
                classified => Err(classified),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::quant::MockControlPlane;

    #[tokio::test]
    async fn test_probe_present() {
        let mut client = MockControlPlane::new();
        client
            .expect_get_environment()
            .withf(|org: &str, app: &str, name: &str| org == "acme" && app == "shop" && name == "staging")
            .times(1)
            .returning(|_, _, name| {
                Ok(Environment {
                    env_name: name.to_string(),
                    ..Environment::default()
                })
            });

        let result = ExistenceProber::new(&client)
            .probe("acme", "shop", "staging")
            .await
            .expect("probe succeeds");
        assert!(result.is_present());
    }

    #[tokio::test]
    async fn test_probe_absent_on_not_found() {
        let mut client = MockControlPlane::new();
        client
            .expect_get_environment()
            .times(1)
            .returning(|_, _, _| Err(ApiError::http(404, None)));

        let result = ExistenceProber::new(&client)
            .probe("acme", "shop", "staging")
            .await
            .expect("probe succeeds");
        assert_eq!(result, ProbeResult::Absent);
    }

    #[tokio::test]
    async fn test_probe_propagates_other_failures() {
        let mut client = MockControlPlane::new();
        client
            .expect_get_environment()
            .times(1)
            .returning(|_, _, _| Err(ApiError::http(401, Some(String::from("Invalid token")))));

        let err = ExistenceProber::new(&client)
            .probe("acme", "shop", "staging")
            .await
            .expect_err("probe fails");
        assert_eq!(
            err,
            ClassifiedError::Remote {
                message: String::from("Invalid token")
            }
        );
    }
}
