//! .NET language plugin for the policy analyzer host.
//!
//! The plugin compiles a policy pack written in C# so the host can run it.
//! For each compile request it:
//!
//! 1. locates the single `*.csproj` descriptor in the program directory,
//! 2. picks the output directory, creating a temporary one when none is given,
//! 3. resolves `dotnet` on the search path,
//! 4. runs `dotnet build <descriptor> -o <out> --configuration Release` to
//!    completion with output streamed to the plugin's log sink,
//! 5. returns `<out>/<project>` (or `<out>/<project>.exe` on Windows).
//!
//! [`DotnetCompiler`] is registered with [`policy_analyzer_host`] as its
//! [`CompileTarget`](policy_analyzer_host::CompileTarget); the host owns the
//! request transport around it.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use policy_analyzer_config::Config;
//! use policy_analyzer_host::CompileConfig;
//! use pulumi_analyzer_policy_dotnet::{DotnetCompiler, OutputSink, ProcessBuildRunner, Toolchain};
//!
//! let compiler = DotnetCompiler::new(
//!     &Config::default(),
//!     Toolchain::from_env(),
//!     ProcessBuildRunner::new(OutputSink::Inherit),
//! );
//! let request = CompileConfig::new(PathBuf::from("/policies/aws"), None);
//! let result = compiler.compile_program(&request)?;
//! println!("policy executable: {}", result.program().display());
//! # Ok::<(), pulumi_analyzer_policy_dotnet::CompileError>(())
//! ```

pub mod app;
pub mod build;
pub mod error;
pub mod locator;
pub mod sink;
pub mod telemetry;
pub mod toolchain;

#[cfg(test)]
mod tests;

pub use self::build::{
    BuildInvocation, BuildRunner, DotnetCompiler, ProcessBuildRunner, executable_path,
};
pub use self::error::{BuildFailure, CompileError, CompileErrorKind};
pub use self::locator::{LocatedProgram, locate_program};
pub use self::sink::OutputSink;
pub use self::toolchain::Toolchain;
