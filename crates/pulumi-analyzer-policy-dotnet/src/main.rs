//! Binary entrypoint for the .NET policy analyzer plugin.

use std::process::ExitCode;

fn main() -> ExitCode {
    pulumi_analyzer_policy_dotnet::app::run(std::env::args_os())
}
