use std::env;

use camino::Utf8PathBuf;

/// Default log filter expression used by the plugin.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// File name of the default log file, placed in the system temp directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "pulumi-analyzer-policy-dotnet.log";

/// Build tool looked up on the search path when none is configured.
pub const DEFAULT_DOTNET_EXECUTABLE: &str = "dotnet";

/// Build configuration passed to `dotnet build`.
pub const DEFAULT_BUILD_CONFIGURATION: &str = "Release";

/// Default log filter expression used by the plugin.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the plugin.
#[must_use]
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Absolute path of the default log file.
#[must_use]
pub fn default_log_file() -> Utf8PathBuf {
    let base = Utf8PathBuf::from_path_buf(env::temp_dir())
        .unwrap_or_else(|_| Utf8PathBuf::from("/tmp"));
    base.join(DEFAULT_LOG_FILE_NAME)
}

/// Default build tool name.
#[must_use]
pub const fn default_dotnet_executable() -> &'static str {
    DEFAULT_DOTNET_EXECUTABLE
}

pub(crate) fn default_dotnet_executable_string() -> String {
    DEFAULT_DOTNET_EXECUTABLE.to_owned()
}

/// Default build configuration name.
#[must_use]
pub const fn default_build_configuration() -> &'static str {
    DEFAULT_BUILD_CONFIGURATION
}

pub(crate) fn default_build_configuration_string() -> String {
    DEFAULT_BUILD_CONFIGURATION.to_owned()
}
