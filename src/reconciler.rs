//! Reconciler for a single environment.
//!
//! This module implements the state machine that compares the desired
//! environment (from the action inputs) with what the control plane reports
//! and issues at most one mutating call to converge them.
//!
//! ```text
//! Start ──delete──────────────► Deleting ──► Done | Failed
//!   │ ──no compose, no clone──► Failed
//!   └──────────────────────────► Probing ──absent──► Creating ──► Done | Failed
//!                                    │ ────present──► Updating ──► Done | Failed
//!                                    └────error / absent+update / present+strict──► Failed
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::compose::{sanitize, ContainerValidator};
use crate::config::{CreateMode, EnvironmentSpec, Operation};
use crate::error::{ClassifiedError, ReconcileError};
use crate::quant::{
    classify, ControlPlane, CreateEnvironmentRequest, ExistenceProber, ProbeResult,
    UpdateEnvironmentRequest,
};

/// States of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileState {
    /// Nothing has been decided yet.
    Start,
    /// The environment is being deleted.
    Deleting,
    /// The environment's existence is being checked.
    Probing,
    /// The environment is being created.
    Creating,
    /// The environment is being updated.
    Updating,
    /// Terminal: the environment was reconciled.
    Done(String),
    /// Terminal: the run failed.
    Failed(ReconcileError),
}

impl ReconcileState {
    /// Returns true for `Done` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed(_))
    }

    /// Returns the state name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Deleting => "deleting",
            Self::Probing => "probing",
            Self::Creating => "creating",
            Self::Updating => "updating",
            Self::Done(_) => "done",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for ReconcileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconciliationResult {
    /// The environment was reconciled.
    Success {
        /// Name reported for the environment.
        environment_name: String,
    },
    /// The run failed.
    Failure {
        /// Failure message; remote messages take precedence.
        message: String,
    },
}

impl ReconciliationResult {
    /// Returns true on success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<ReconcileState> for ReconciliationResult {
    fn from(state: ReconcileState) -> Self {
        match state {
            ReconcileState::Done(environment_name) => Self::Success { environment_name },
            ReconcileState::Failed(err) => Self::Failure {
                message: err.to_string(),
            },
            other => Self::Failure {
                message: format!("Reconciliation stopped in non-terminal state '{other}'"),
            },
        }
    }
}

/// Reconciler for one environment.
pub struct Reconciler<'a, C: ?Sized> {
    /// Desired state.
    spec: &'a EnvironmentSpec,
    /// Control-plane client.
    client: &'a C,
    /// Container validator.
    validator: ContainerValidator,
}

impl<'a, C: ControlPlane + ?Sized> Reconciler<'a, C> {
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(spec: &'a EnvironmentSpec, client: &'a C) -> Self {
        Self {
            spec,
            client,
            validator: ContainerValidator::new(),
        }
    }

    /// Runs the state machine to completion.
    pub async fn reconcile(&self) -> ReconciliationResult {
        info!(
            "Starting {} for environment {}/{}/{}",
            self.spec.operation, self.spec.organization, self.spec.application, self.spec.name
        );

        let result = ReconciliationResult::from(self.run().await);

        match &result {
            ReconciliationResult::Success { environment_name } => {
                info!("Environment {environment_name} reconciled");
            }
            ReconciliationResult::Failure { message } => {
                error!("Reconciliation failed: {message}");
            }
        }

        result
    }

    /// Drives [`Self::step`] from `Start` until a terminal state.
    pub async fn run(&self) -> ReconcileState {
        let mut state = ReconcileState::Start;
        while !state.is_terminal() {
            let next = self.step(state.clone()).await;
            debug!("Transition {state} -> {next}");
            state = next;
        }
        state
    }

    /// Performs a single transition.
    ///
    /// Terminal states are returned unchanged.
    pub async fn step(&self, state: ReconcileState) -> ReconcileState {
        match state {
            ReconcileState::Start => self.start(),
            ReconcileState::Deleting => self.delete().await,
            ReconcileState::Probing => self.probe().await,
            ReconcileState::Creating => self.create().await,
            ReconcileState::Updating => self.update().await,
            terminal @ (ReconcileState::Done(_) | ReconcileState::Failed(_)) => terminal,
        }
    }

    /// Chooses the first branch. Makes no network call.
    fn start(&self) -> ReconcileState {
        if self.spec.operation == Operation::Delete {
            return ReconcileState::Deleting;
        }

        if !self.spec.has_definition_source() {
            return ReconcileState::Failed(ReconcileError::validation(format!(
                "Either compose_spec or from_environment is required to {} environment '{}'",
                self.spec.operation, self.spec.name
            )));
        }

        ReconcileState::Probing
    }

    /// Deletes the environment. An absent environment counts as deleted.
    async fn delete(&self) -> ReconcileState {
        let spec = self.spec;
        match self
            .client
            .delete_environment(&spec.organization, &spec.application, &spec.name)
            .await
        {
            Ok(()) => {
                info!("Deleted environment {}", spec.name);
                ReconcileState::Done(spec.name.clone())
            }
            Err(err) => match classify(&err) {
                ClassifiedError::NotFound { .. } => {
                    info!("Environment {} does not exist, nothing to delete", spec.name);
                    ReconcileState::Done(spec.name.clone())
                }
                classified => ReconcileState::Failed(classified.into()),
            },
        }
    }

    /// Checks existence and picks create or update.
    async fn probe(&self) -> ReconcileState {
        let spec = self.spec;
        let probe = ExistenceProber::new(self.client)
            .probe(&spec.organization, &spec.application, &spec.name)
            .await;

        match probe {
            Err(classified) => ReconcileState::Failed(classified.into()),
            Ok(ProbeResult::Absent) if spec.operation == Operation::Update => {
                ReconcileState::Failed(ReconcileError::DoesNotExist {
                    name: spec.name.clone(),
                })
            }
            Ok(ProbeResult::Absent) => ReconcileState::Creating,
            Ok(ProbeResult::Present(_))
                if spec.operation == Operation::Create && spec.create_mode == CreateMode::Strict =>
            {
                ReconcileState::Failed(ReconcileError::AlreadyExists {
                    name: spec.name.clone(),
                })
            }
            Ok(ProbeResult::Present(_)) => {
                if spec.operation == Operation::Create {
                    info!("Environment {} already exists, updating it instead", spec.name);
                }
                ReconcileState::Updating
            }
        }
    }

    /// Builds the create request.
    fn create_request(&self) -> CreateEnvironmentRequest {
        let spec = self.spec;
        let compose = match (&spec.compose, &spec.clone_from) {
            (Some(compose), _) => sanitize(compose),
            (None, None) => sanitize(&Value::Object(Map::new())),
            (None, Some(_)) => None,
        };

        CreateEnvironmentRequest {
            env_name: spec.name.clone(),
            min_capacity: spec.min_capacity,
            max_capacity: spec.max_capacity,
            compose_definition: compose,
            clone_configuration_from: spec.clone_from.clone(),
            image_suffix: spec.image_suffix.clone(),
        }
    }

    /// Creates the environment.
    async fn create(&self) -> ReconcileState {
        let spec = self.spec;
        let request = self.create_request();

        if let Some(source) = &request.clone_configuration_from {
            info!("Creating environment {} cloned from {source}", spec.name);
        }

        match self
            .client
            .create_environment(&spec.organization, &spec.application, &request)
            .await
        {
            Ok(environment) => {
                let name = if environment.env_name.is_empty() {
                    warn!("Create response omitted the environment name");
                    spec.name.clone()
                } else {
                    environment.env_name
                };
                ReconcileState::Done(name)
            }
            Err(err) => ReconcileState::Failed(classify(&err).into()),
        }
    }

    /// Builds and validates the update request.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the compose definition is missing or a
    /// container lacks an image reference.
    pub fn update_request(&self) -> Result<UpdateEnvironmentRequest, ReconcileError> {
        let spec = self.spec;
        let compose = spec.compose.as_ref().and_then(sanitize).ok_or_else(|| {
            ReconcileError::validation(format!(
                "compose_spec is required to update environment '{}'",
                spec.name
            ))
        })?;

        self.validator.validate(&compose)?;

        Ok(UpdateEnvironmentRequest {
            compose_definition: compose,
            min_capacity: spec.min_capacity,
            max_capacity: spec.max_capacity,
            image_suffix: spec.image_suffix.clone(),
        })
    }

    /// Updates the environment.
    async fn update(&self) -> ReconcileState {
        let spec = self.spec;
        let request = match self.update_request() {
            Ok(request) => request,
            Err(err) => return ReconcileState::Failed(err),
        };

        match self
            .client
            .update_environment(&spec.organization, &spec.application, &spec.name, &request)
            .await
        {
            Ok(environment) => {
                let name = environment
                    .map(|env| env.env_name)
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| spec.name.clone());
                ReconcileState::Done(name)
            }
            Err(err) => {
                error!("Update of environment {} rejected: {err}", spec.name);
                ReconcileState::Failed(classify(&err).into())
            }
        }
    }
}
