//! Request loop that drives a [`CompileTarget`].
//!
//! [`serve`] reads one [`CompileConfig`] per line until EOF, invokes the
//! target synchronously, and writes one [`CompileResponse`] line per request.
//! Requests are handled one at a time on the calling thread; a compile that
//! blocks on a build subprocess blocks the loop with it.

use std::error::Error as StdError;
use std::io::{self, BufRead, Write};

use tracing::{debug, info, warn};

use crate::error::HostError;
use crate::protocol::{CompileConfig, CompileResponse, CompileResult};

/// Tracing target for host loop events.
const HOST_TARGET: &str = "policy_analyzer_host::serve";

/// Callback a language plugin registers with the host.
///
/// Implementations block the calling thread until the artefact is produced
/// or the attempt fails. The host never retries a failed call.
pub trait CompileTarget {
    /// Error reported for a failed compile.
    type Error: StdError;

    /// Compiles the program described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the plugin's error when the program cannot be compiled.
    fn compile(&self, config: &CompileConfig) -> Result<CompileResult, Self::Error>;
}

/// Host configuration supplied by a language plugin's entry point.
#[derive(Debug)]
pub struct MainConfig<T> {
    compile_target: T,
}

impl<T> MainConfig<T> {
    /// Registers the compile callback.
    #[must_use]
    pub const fn new(compile_target: T) -> Self {
        Self { compile_target }
    }

    /// Returns the registered compile callback.
    #[must_use]
    pub const fn compile_target(&self) -> &T {
        &self.compile_target
    }
}

/// Counters reported when the request stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    handled: usize,
    failed: usize,
}

impl ServeSummary {
    /// Number of requests answered.
    #[must_use]
    pub const fn handled(&self) -> usize {
        self.handled
    }

    /// Number of requests answered with a failure response.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    fn record(&mut self, response: &CompileResponse) {
        self.handled += 1;
        if !response.is_success() {
            self.failed += 1;
        }
    }
}

/// Runs the host loop on the process's stdin and stdout.
///
/// # Errors
///
/// Returns a [`HostError`] when the process streams fail.
pub fn main<T: CompileTarget>(config: &MainConfig<T>) -> Result<ServeSummary, HostError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    serve(&mut reader, &mut writer, config)
}

/// Answers compile requests read from `input` until EOF.
///
/// Lines are parsed as raw bytes, so input that is not UTF-8 is rejected
/// in-band like any other malformed request.
///
/// # Errors
///
/// Returns a [`HostError`] when reading a request, or serialising or writing
/// a response, fails. Compile failures are reported in-band instead.
pub fn serve<T: CompileTarget>(
    input: &mut impl BufRead,
    output: &mut impl Write,
    config: &MainConfig<T>,
) -> Result<ServeSummary, HostError> {
    let mut summary = ServeSummary::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        let bytes_read = input
            .read_until(b'\n', &mut line)
            .map_err(HostError::read)?;
        if bytes_read == 0 {
            break;
        }
        let request = line.trim_ascii();
        if request.is_empty() {
            continue;
        }

        let response = dispatch(config.compile_target(), request);
        summary.record(&response);
        write_response(output, &response)?;
    }

    info!(
        target: HOST_TARGET,
        handled = summary.handled(),
        failed = summary.failed(),
        "request stream closed"
    );
    Ok(summary)
}

fn dispatch<T: CompileTarget>(target: &T, request: &[u8]) -> CompileResponse {
    let config = match serde_json::from_slice::<CompileConfig>(request) {
        Ok(config) => config,
        Err(error) => {
            warn!(target: HOST_TARGET, %error, "rejecting malformed compile request");
            return CompileResponse::error(format!("invalid compile request JSON: {error}"));
        }
    };

    debug!(
        target: HOST_TARGET,
        program_directory = %config.program_directory().display(),
        "dispatching compile request"
    );

    match target.compile(&config) {
        Ok(result) => CompileResponse::success(result),
        Err(error) => {
            let message = error_chain(&error);
            warn!(target: HOST_TARGET, error = %message, "compile request failed");
            CompileResponse::error(message)
        }
    }
}

/// Renders an error followed by each of its sources.
pub(crate) fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn write_response(output: &mut impl Write, response: &CompileResponse) -> Result<(), HostError> {
    let payload = serde_json::to_string(response).map_err(HostError::serialize)?;
    output
        .write_all(payload.as_bytes())
        .map_err(HostError::write)?;
    output.write_all(b"\n").map_err(HostError::write)?;
    output.flush().map_err(HostError::write)
}
