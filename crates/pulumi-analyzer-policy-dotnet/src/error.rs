//! Errors raised while compiling a .NET policy program.
//!
//! Every failure is terminal for the request that raised it. Callers can
//! branch on [`CompileError::kind`] rather than matching variants.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Coarse classification of a [`CompileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// A project descriptor or the build tool could not be found.
    NotFound,
    /// A filesystem operation failed.
    Io,
    /// The build tool could not be started or exited unsuccessfully.
    BuildFailed,
}

/// Why a build subprocess did not succeed.
#[derive(Debug, Clone, Error)]
pub enum BuildFailure {
    /// The process could not be spawned.
    #[error("failed to spawn build process: {source}")]
    Spawn {
        /// Underlying spawn error.
        #[source]
        source: Arc<std::io::Error>,
    },
    /// The process ran and exited unsuccessfully.
    #[error("{}", describe_exit(*status))]
    NonZeroExit {
        /// Exit code, or `None` when the process was killed by a signal.
        status: Option<i32>,
    },
}

impl BuildFailure {
    /// Wraps a spawn error.
    #[must_use]
    pub fn spawn(source: std::io::Error) -> Self {
        Self::Spawn {
            source: Arc::new(source),
        }
    }
}

fn describe_exit(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("build process exited with status {code}"),
        None => String::from("build process was terminated by a signal"),
    }
}

/// Errors arising from a compile request.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    /// No project descriptor matched the search pattern.
    #[error("failed to find csproj files for 'dotnet build' matching {pattern}")]
    DescriptorNotFound {
        /// The `<dir>/*.csproj` pattern that was searched.
        pattern: String,
        /// Directory listing error, when the search itself failed.
        #[source]
        source: Option<Arc<std::io::Error>>,
    },

    /// The temporary output directory could not be created.
    #[error("unable to create dotnet program temp directory: {source}")]
    OutputDirectory {
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The build tool is not installed on the search path.
    #[error("unable to find '{tool}' executable")]
    ToolNotFound {
        /// Name that was looked up.
        tool: String,
    },

    /// The build tool could not complete the build.
    #[error("unable to run `{tool} build`: {failure}")]
    BuildFailed {
        /// Configured build tool name.
        tool: String,
        /// Resolved build tool path.
        path: PathBuf,
        /// Spawn or exit failure.
        #[source]
        failure: BuildFailure,
    },
}

impl CompileError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> CompileErrorKind {
        match self {
            Self::DescriptorNotFound { .. } | Self::ToolNotFound { .. } => {
                CompileErrorKind::NotFound
            }
            Self::OutputDirectory { .. } => CompileErrorKind::Io,
            Self::BuildFailed { .. } => CompileErrorKind::BuildFailed,
        }
    }
}
