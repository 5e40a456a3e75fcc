//! Builds a located .NET project with `dotnet build`.
//!
//! [`DotnetCompiler`] is the [`CompileTarget`] registered with the analyzer
//! host. It locates the project descriptor, picks the output directory,
//! resolves the build tool, and hands a [`BuildInvocation`] to a
//! [`BuildRunner`]. The runner abstraction lets tests observe the exact
//! invocation without spawning `dotnet`.

use std::ffi::{OsStr, OsString};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::process::{Command, Stdio};

use policy_analyzer_config::Config;
use policy_analyzer_host::{CompileConfig, CompileResult, CompileTarget};
use tempfile::Builder;
use tracing::{debug, info, warn};

use crate::error::{BuildFailure, CompileError};
use crate::locator::locate_program;
use crate::sink::OutputSink;
use crate::toolchain::Toolchain;

/// Prefix of temporary output directories.
pub const TEMP_DIR_PREFIX: &str = "pulumi-dotnet.";

const BUILD_TARGET: &str = "pulumi_analyzer_policy_dotnet::build";

/// A fully resolved build tool command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    program: PathBuf,
    args: Vec<OsString>,
    working_dir: PathBuf,
}

impl BuildInvocation {
    /// Assembles `<tool> build <descriptor> -o <out> --configuration <name>`.
    #[must_use]
    pub fn dotnet_build(
        tool: &Path,
        descriptor: &Path,
        output_dir: &Path,
        configuration: &str,
        working_dir: &Path,
    ) -> Self {
        Self {
            program: tool.to_path_buf(),
            args: vec![
                OsString::from("build"),
                descriptor.as_os_str().to_owned(),
                OsString::from("-o"),
                output_dir.as_os_str().to_owned(),
                OsString::from("--configuration"),
                OsString::from(configuration),
            ],
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Executable to spawn.
    #[must_use]
    pub fn program(&self) -> &Path {
        self.program.as_path()
    }

    /// Arguments passed to the executable.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Working directory of the child process.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        self.working_dir.as_path()
    }
}

/// Runs a build invocation to completion.
pub trait BuildRunner {
    /// Spawns the invocation and blocks the calling thread until it exits.
    ///
    /// There is no timeout and no cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`BuildFailure::Spawn`] when the process cannot start and
    /// [`BuildFailure::NonZeroExit`] when it exits unsuccessfully.
    fn run_to_completion(&self, invocation: &BuildInvocation) -> Result<(), BuildFailure>;
}

/// Spawns build tools as child processes writing to an [`OutputSink`].
///
/// Children read from the null device. The plugin's own stdin carries host
/// requests and is never shared.
#[derive(Debug, Clone, Default)]
pub struct ProcessBuildRunner {
    sink: OutputSink,
}

impl ProcessBuildRunner {
    /// Creates a runner whose children write to `sink`.
    #[must_use]
    pub const fn new(sink: OutputSink) -> Self {
        Self { sink }
    }
}

impl BuildRunner for ProcessBuildRunner {
    fn run_to_completion(&self, invocation: &BuildInvocation) -> Result<(), BuildFailure> {
        let stdout = self.sink.stdio().map_err(BuildFailure::spawn)?;
        let stderr = self.sink.stdio().map_err(BuildFailure::spawn)?;

        let status = Command::new(invocation.program())
            .args(invocation.args())
            .current_dir(invocation.working_dir())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .map_err(BuildFailure::spawn)?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildFailure::NonZeroExit {
                status: status.code(),
            })
        }
    }
}

/// Path of the executable `dotnet build` writes for `project_name`.
///
/// Hosts whose path separator is `/` produce an extension-less executable;
/// every other host gets `.exe`.
#[must_use]
pub fn executable_path(
    output_dir: &Path,
    project_name: impl AsRef<OsStr>,
    separator: char,
) -> PathBuf {
    let mut file_name = project_name.as_ref().to_os_string();
    if separator != '/' {
        file_name.push(".exe");
    }
    output_dir.join(file_name)
}

/// Compiles .NET policy programs.
#[derive(Debug, Clone)]
pub struct DotnetCompiler<R> {
    runner: R,
    toolchain: Toolchain,
    dotnet_executable: String,
    build_configuration: String,
}

impl<R> DotnetCompiler<R> {
    /// Creates a compiler using the configured tool and build configuration.
    #[must_use]
    pub fn new(config: &Config, toolchain: Toolchain, runner: R) -> Self {
        Self {
            runner,
            toolchain,
            dotnet_executable: config.dotnet_executable().to_owned(),
            build_configuration: config.build_configuration().to_owned(),
        }
    }

    /// Returns the build runner.
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: BuildRunner> DotnetCompiler<R> {
    /// Compiles the program described by `config`, blocking until the build
    /// tool exits.
    ///
    /// Without an output location a fresh temporary directory is created and
    /// left in place for the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] as soon as any step fails. Nothing is
    /// retried.
    pub fn compile_program(&self, config: &CompileConfig) -> Result<CompileResult, CompileError> {
        let program_dir = config.program_directory();
        let located = locate_program(program_dir)?;

        let output_dir = match config.output_location() {
            Some(path) => path.to_path_buf(),
            None => create_output_dir()?,
        };

        let tool = self.toolchain.find_executable(&self.dotnet_executable)?;
        let invocation = BuildInvocation::dotnet_build(
            &tool,
            located.descriptor(),
            &output_dir,
            &self.build_configuration,
            program_dir,
        );

        debug!(
            target: BUILD_TARGET,
            program_directory = %program_dir.display(),
            tool = %tool.display(),
            output = %output_dir.display(),
            "attempting to build .NET program"
        );

        self.runner
            .run_to_completion(&invocation)
            .map_err(|failure| CompileError::BuildFailed {
                tool: self.dotnet_executable.clone(),
                path: tool.clone(),
                failure,
            })?;

        let program = executable_path(&output_dir, located.project_name(), MAIN_SEPARATOR);
        if !program.exists() {
            warn!(
                target: BUILD_TARGET,
                program = %program.display(),
                "build succeeded but the expected executable is missing"
            );
        }
        info!(target: BUILD_TARGET, program = %program.display(), "built .NET program");
        Ok(CompileResult::new(program))
    }
}

impl<R: BuildRunner> CompileTarget for DotnetCompiler<R> {
    type Error = CompileError;

    fn compile(&self, config: &CompileConfig) -> Result<CompileResult, CompileError> {
        self.compile_program(config)
    }
}

fn create_output_dir() -> Result<PathBuf, CompileError> {
    Builder::new()
        .prefix(TEMP_DIR_PREFIX)
        .tempdir()
        .map(tempfile::TempDir::keep)
        .map_err(|source| CompileError::OutputDirectory {
            source: std::sync::Arc::new(source),
        })
}
