//! Process entry point wiring configuration, telemetry and the host loop.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use policy_analyzer_config::{Config, OrthoError};
use policy_analyzer_host::{HostError, MainConfig};
use thiserror::Error;
use tracing::info;

use crate::build::{DotnetCompiler, ProcessBuildRunner};
use crate::sink::OutputSink;
use crate::telemetry::{self, TelemetryError};
use crate::toolchain::Toolchain;

const APP_TARGET: &str = "pulumi_analyzer_policy_dotnet::app";

/// Errors that stop the plugin before or while serving requests.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {0}")]
    Configuration(#[source] Arc<OrthoError>),
    /// Telemetry could not be installed.
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[source] TelemetryError),
    /// The host transport failed.
    #[error("analyzer host failed: {0}")]
    Host(#[source] HostError),
}

/// Runs the plugin with the process arguments and standard streams.
#[must_use]
pub fn run<I>(args: I) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
{
    match start(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            writeln!(io::stderr().lock(), "{error}").ok();
            ExitCode::FAILURE
        }
    }
}

fn start<I>(args: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = OsString>,
{
    let config = Config::load_from_args(args).map_err(AppError::Configuration)?;
    let sink = OutputSink::open_or_inherit(config.log_file().as_std_path(), &mut io::stdout());
    telemetry::initialise(&config, &sink).map_err(AppError::Telemetry)?;

    info!(
        target: APP_TARGET,
        log_file = %config.log_file(),
        logging_to_file = sink.is_file(),
        "starting .NET policy analyzer plugin"
    );

    let compiler = DotnetCompiler::new(
        &config,
        Toolchain::from_env(),
        ProcessBuildRunner::new(sink),
    );
    policy_analyzer_host::main(&MainConfig::new(compiler)).map_err(AppError::Host)?;
    Ok(())
}
