//! Shared configuration for the .NET policy analyzer plugin.
//!
//! Values are layered by `ortho_config`: built-in defaults, then an optional
//! configuration file, then `PULUMI_POLICY_DOTNET_*` environment variables,
//! then command-line flags. The plugin binary only forwards the flags listed
//! in [`CONFIG_CLI_FLAGS`] so arguments supplied by the analyzer host never
//! reach the loader.

mod defaults;
mod logging;

use std::ffi::{OsStr, OsString};
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_BUILD_CONFIGURATION, DEFAULT_DOTNET_EXECUTABLE, DEFAULT_LOG_FILE_NAME,
    DEFAULT_LOG_FILTER, default_build_configuration, default_dotnet_executable,
    default_log_file, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use ortho_config::OrthoError;

/// Flags understood by [`Config::load_from_args`].
pub const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--log-file",
    "--dotnet-executable",
    "--build-configuration",
];

/// Resolved plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PULUMI_POLICY_DOTNET")]
#[serde(default)]
pub struct Config {
    /// `tracing` filter expression applied to the log sink.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Output format of log records.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// File receiving build output and log records.
    #[serde(default = "defaults::default_log_file")]
    pub log_file: Utf8PathBuf,
    /// Name or path of the `dotnet` executable.
    #[serde(default = "defaults::default_dotnet_executable_string")]
    pub dotnet_executable: String,
    /// Value passed to `dotnet build --configuration`.
    #[serde(default = "defaults::default_build_configuration_string")]
    pub build_configuration: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: defaults::default_log_filter_string(),
            log_format: defaults::default_log_format(),
            log_file: defaults::default_log_file(),
            dotnet_executable: defaults::default_dotnet_executable_string(),
            build_configuration: defaults::default_build_configuration_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the filtered process arguments.
    ///
    /// Arguments that are not configuration flags are dropped before the
    /// loader sees them.
    ///
    /// # Errors
    ///
    /// Returns the aggregated loader error when any layer fails to parse.
    pub fn load_from_args<I>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        Self::load_from_iter(config_arguments(&args))
    }

    /// Filter expression for the log sink.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format for log records.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Path of the log file.
    #[must_use]
    pub fn log_file(&self) -> &Utf8PathBuf {
        &self.log_file
    }

    /// Build tool name or path.
    #[must_use]
    pub fn dotnet_executable(&self) -> &str {
        self.dotnet_executable.as_str()
    }

    /// Build configuration name.
    #[must_use]
    pub fn build_configuration(&self) -> &str {
        self.build_configuration.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

fn process_config_flag(argument: &OsStr) -> FlagAction {
    let argument_text = argument.to_string_lossy();
    if !argument_text.starts_with("--") {
        return FlagAction::Skip;
    }

    let mut flag_parts = argument_text.splitn(2, '=');
    let flag = flag_parts.next().unwrap_or_default();
    let has_inline_value = flag_parts.next().is_some();

    if CONFIG_CLI_FLAGS.contains(&flag) {
        return FlagAction::Include {
            needs_value: !has_inline_value,
        };
    }

    FlagAction::Skip
}

/// Keeps the program name plus every recognised configuration flag and its
/// value, wherever they appear in `args`.
#[must_use]
pub fn config_arguments(args: &[OsString]) -> Vec<OsString> {
    let mut arguments = args.iter();
    let mut filtered: Vec<OsString> = Vec::new();
    let Some(program) = arguments.next() else {
        return filtered;
    };
    filtered.push(program.clone());

    while let Some(argument) = arguments.next() {
        if let FlagAction::Include { needs_value } = process_config_flag(argument) {
            filtered.push(argument.clone());
            if needs_value {
                if let Some(value) = arguments.next() {
                    filtered.push(value.clone());
                }
            }
        }
    }

    filtered
}
