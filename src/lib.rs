// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![cfg_attr(not(test), deny(missing_docs))] // All public items must be documented
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # quant-env
//!
//! Declarative, idempotent reconciliation of Quant Cloud environments.
//!
//! ## Overview
//!
//! quant-env is meant to run as a deployment pipeline step. Given an
//! environment name, a compose definition and capacity bounds, it brings
//! the environment on the control plane in line with them:
//!
//! - Create the environment when it is absent
//! - Update it when it already exists
//! - Delete it, treating an already-absent environment as deleted
//!
//! ## Architecture
//!
//! 1. **Desired State**: Read from the action inputs (`INPUT_*` variables)
//! 2. **Observed State**: A single existence probe against the Quant Cloud API
//! 3. **Reconciler**: A state machine that issues at most one mutating call
//!
//! ## Modules
//!
//! - [`config`]: Input resolution and validation
//! - [`compose`]: Compose definition sanitizing and container checks
//! - [`quant`]: Quant Cloud API client, failure classification, existence probe
//! - [`reconciler`]: The reconciliation state machine
//! - [`cli`]: Command-line interface and step outputs
//!
//! ## Example
//!
//! ```yaml
//! - name: Deploy preview environment
//!   run: quant-env
//!   env:
//!     INPUT_API_KEY: ${{ secrets.QUANT_API_KEY }}
//!     INPUT_ORGANIZATION: acme
//!     INPUT_APP_NAME: shop
//!     INPUT_ENVIRONMENT_NAME: pr-${{ github.event.number }}
//!     INPUT_COMPOSE_SPEC: '{"containers":[{"name":"web","imageReference":"shop:latest"}]}'
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod quant;
pub mod reconciler;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter, OutputSink};
pub use compose::{sanitize, ContainerValidator};
pub use config::{ActionInputs, ClientConfig, EnvironmentSpec, Operation};
pub use error::{ClassifiedError, QuantError, Result};
pub use quant::{classify, ControlPlane, ExistenceProber, QuantClient};
pub use reconciler::{ReconcileState, ReconciliationResult, Reconciler};
