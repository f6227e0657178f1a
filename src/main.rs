//! quant-env CLI entrypoint.
//!
//! This is the main entrypoint for the quant-env command-line tool, usually
//! run as a GitHub Actions step.

use std::process::ExitCode;
use std::time::Duration;

use quant_env::cli::{
    annotate_failure, default_sink, Cli, Commands, LogFormat, OutputFormatter,
    ENVIRONMENT_NAME_OUTPUT,
};
use quant_env::config::{ActionInputs, EnvironmentSpec, InputParser};
use quant_env::error::{QuantError, ReconcileError, Result};
use quant_env::quant::{ExistenceProber, QuantClient};
use quant_env::reconciler::{ReconciliationResult, Reconciler};

use clap::Parser;
use tracing::{debug, info_span, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Main entrypoint.
fn main() -> ExitCode {
    // Inputs are read from the environment, so .env must be loaded first
    if let Err(e) = InputParser::new().load_dotenv() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let span = info_span!("run", run_id = %Uuid::new_v4());
    match runtime.block_on(run(cli).instrument(span)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = e.to_string();
            eprintln!("Error: {message}");
            annotate_failure(&message);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
///
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);
    let timeout = cli.timeout_secs.map(Duration::from_secs);

    let (client, spec) = resolve(&cli.inputs, &InputParser::new(), timeout)?;

    match cli.selected_command() {
        Commands::Reconcile => cmd_reconcile(&client, &spec, &formatter).await,
        Commands::Probe => cmd_probe(&client, &spec, &formatter).await,
    }
}

/// Reconcile the environment and publish its name.
async fn cmd_reconcile(
    client: &QuantClient,
    spec: &EnvironmentSpec,
    formatter: &OutputFormatter,
) -> Result<()> {
    let result = Reconciler::new(spec, client).reconcile().await;
    eprint!("{}", formatter.format_result(spec, &result));

    match result {
        ReconciliationResult::Success { environment_name } => {
            default_sink().set_output(ENVIRONMENT_NAME_OUTPUT, &environment_name)?;
            Ok(())
        }
        ReconciliationResult::Failure { message } => Err(QuantError::ReconciliationFailed(message)),
    }
}

/// Report whether the environment exists.
async fn cmd_probe(
    client: &QuantClient,
    spec: &EnvironmentSpec,
    formatter: &OutputFormatter,
) -> Result<()> {
    let probe = ExistenceProber::new(client)
        .probe(&spec.organization, &spec.application, &spec.name)
        .await
        .map_err(ReconcileError::from)?;

    eprint!("{}", formatter.format_probe(spec, &probe));
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Builds the client and the environment spec from the inputs.
fn resolve(
    inputs: &ActionInputs,
    parser: &InputParser,
    timeout: Option<Duration>,
) -> Result<(QuantClient, EnvironmentSpec)> {
    let spec = inputs.environment_spec(parser)?;
    let client = QuantClient::new(inputs.client_config(timeout)?)?;

    debug!("Using Quant Cloud API at {}", client.base_url());
    Ok((client, spec))
}
