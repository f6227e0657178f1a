//! Configuration module.
//!
//! This module turns the raw invocation inputs into the typed values a run
//! needs:
//! - Reading inputs from flags and `INPUT_*` variables
//! - Parsing compose documents and capacity bounds
//! - Validating the resolved environment spec

mod inputs;
mod parser;
mod spec;
mod validator;

pub use inputs::ActionInputs;
pub use parser::InputParser;
pub use spec::{
    ClientConfig, CreateMode, DEFAULT_BASE_URL, DEFAULT_CAPACITY, EnvironmentSpec, Operation,
};
pub use validator::{SpecValidator, ValidationError, ValidationResult};
