//! Records exchanged between the analyzer host and a language plugin.
//!
//! A request line is a serialised [`CompileConfig`]. The plugin answers
//! each request with exactly one [`CompileResponse`] line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Compile request handed to a [`CompileTarget`](crate::CompileTarget).
///
/// # Example
///
/// ```
/// use policy_analyzer_host::CompileConfig;
/// use std::path::PathBuf;
///
/// let config = CompileConfig::new(PathBuf::from("/proj"), Some(PathBuf::new()));
/// // An empty output path means "choose a temporary location".
/// assert!(config.output_location().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompileConfig {
    program_directory: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    out_file: Option<PathBuf>,
}

impl CompileConfig {
    /// Creates a compile request.
    #[must_use]
    pub const fn new(program_directory: PathBuf, out_file: Option<PathBuf>) -> Self {
        Self {
            program_directory,
            out_file,
        }
    }

    /// Directory holding the policy program.
    #[must_use]
    pub fn program_directory(&self) -> &Path {
        self.program_directory.as_path()
    }

    /// Requested output location, or `None` when the plugin should pick one.
    #[must_use]
    pub fn output_location(&self) -> Option<&Path> {
        self.out_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

/// Successful outcome of a compile request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompileResult {
    program: PathBuf,
}

impl CompileResult {
    /// Wraps the path of the runnable artefact.
    #[must_use]
    pub const fn new(program: PathBuf) -> Self {
        Self { program }
    }

    /// Path of the runnable artefact.
    #[must_use]
    pub fn program(&self) -> &Path {
        self.program.as_path()
    }

    /// Consumes the result, returning the artefact path.
    #[must_use]
    pub fn into_program(self) -> PathBuf {
        self.program
    }
}

/// Response line written for every compile request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompileResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    program: Option<PathBuf>,
    #[serde(default)]
    diagnostics: Vec<HostDiagnostic>,
}

impl CompileResponse {
    /// Creates a successful response carrying the artefact path.
    #[must_use]
    pub fn success(result: CompileResult) -> Self {
        Self {
            success: true,
            program: Some(result.into_program()),
            diagnostics: Vec::new(),
        }
    }

    /// Creates a failed response with diagnostics.
    #[must_use]
    pub const fn failure(diagnostics: Vec<HostDiagnostic>) -> Self {
        Self {
            success: false,
            program: None,
            diagnostics,
        }
    }

    /// Creates a failed response with a single error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::failure(vec![HostDiagnostic::new(
            DiagnosticSeverity::Error,
            message,
        )])
    }

    /// Returns whether the compile request succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Artefact path of a successful response.
    #[must_use]
    pub fn program(&self) -> Option<&Path> {
        self.program.as_deref()
    }

    /// Diagnostics attached to the response.
    #[must_use]
    pub fn diagnostics(&self) -> &[HostDiagnostic] {
        &self.diagnostics
    }
}

/// A diagnostic message attached to a [`CompileResponse`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostDiagnostic {
    severity: DiagnosticSeverity,
    message: String,
}

impl HostDiagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Severity of the diagnostic.
    #[must_use]
    pub const fn severity(&self) -> DiagnosticSeverity {
        self.severity
    }

    /// Diagnostic text.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Severity levels for host diagnostics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    /// The request failed.
    Error,
    /// The request succeeded with a caveat.
    Warning,
    /// Informational note.
    Info,
}
