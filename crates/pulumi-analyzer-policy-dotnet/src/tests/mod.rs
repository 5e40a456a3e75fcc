//! Shared fixtures and behavioural tests for the .NET compiler.


use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use mockall::mock;
use policy_analyzer_config::Config;
use tempfile::TempDir;

use crate::build::{BuildInvocation, BuildRunner, DotnetCompiler};
use crate::error::BuildFailure;
use crate::toolchain::Toolchain;

/// A policy program directory next to a search path holding a fake `dotnet`.
pub(crate) struct Workspace {
    program: TempDir,
    bin: TempDir,
}

impl Workspace {
    pub(crate) fn new() -> Self {
        Self {
            program: TempDir::new().expect("create program directory"),
            bin: TempDir::new().expect("create bin directory"),
        }
    }

    pub(crate) fn program_dir(&self) -> &Path {
        self.program.path()
    }

    pub(crate) fn add_descriptor(&self, name: &str) -> PathBuf {
        let path = self.program.path().join(name);
        fs::write(&path, "<Project Sdk=\"Microsoft.NET.Sdk\" />\n").expect("write descriptor");
        path
    }

    /// Installs an executable called `dotnet` running `script` under `sh`.
    pub(crate) fn install_tool(&self, script: &str) -> PathBuf {
        let path = self.bin.path().join("dotnet");
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("write fake dotnet");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("chmod fake dotnet");
        }
        path
    }

    pub(crate) fn toolchain(&self) -> Toolchain {
        let search_path = env::join_paths([self.bin.path()]).expect("join search path");
        Toolchain::with_search_path(search_path)
    }

    pub(crate) fn compiler<R>(&self, runner: R) -> DotnetCompiler<R> {
        DotnetCompiler::new(&Config::default(), self.toolchain(), runner)
    }
}

mock! {
    pub(crate) BuildRunner {}
    impl BuildRunner for BuildRunner {
        fn run_to_completion(&self, invocation: &BuildInvocation) -> Result<(), BuildFailure>;
    }
}

/// Runner that succeeds without spawning anything.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SucceedingRunner;

impl BuildRunner for SucceedingRunner {
    fn run_to_completion(&self, _invocation: &BuildInvocation) -> Result<(), BuildFailure> {
        Ok(())
    }
}
