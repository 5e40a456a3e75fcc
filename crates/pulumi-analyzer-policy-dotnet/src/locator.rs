//! Locates the project descriptor inside a policy program directory.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::error::CompileError;

/// Extension identifying a .NET project descriptor.
pub const PROJECT_EXTENSION: &str = "csproj";

const LOCATOR_TARGET: &str = "pulumi_analyzer_policy_dotnet::locator";

/// Project descriptor chosen for a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedProgram {
    descriptor: PathBuf,
    project_name: OsString,
}

impl LocatedProgram {
    /// Path of the `.csproj` file.
    #[must_use]
    pub fn descriptor(&self) -> &Path {
        self.descriptor.as_path()
    }

    /// Descriptor file name without its extension.
    ///
    /// `dotnet build` is assumed to name its executable after this.
    #[must_use]
    pub fn project_name(&self) -> &OsStr {
        self.project_name.as_os_str()
    }
}

/// Search pattern reported when no descriptor is found.
#[must_use]
pub fn search_pattern(directory: &Path) -> String {
    directory
        .join(format!("*.{PROJECT_EXTENSION}"))
        .display()
        .to_string()
}

/// Finds the project descriptor in `directory` without recursing.
///
/// Candidates are sorted by file name and the first one wins. More than one
/// candidate is logged as a warning.
///
/// # Errors
///
/// Returns [`CompileError::DescriptorNotFound`] when the directory cannot be
/// listed or holds no descriptor.
pub fn locate_program(directory: &Path) -> Result<LocatedProgram, CompileError> {
    let not_found = |source: Option<std::io::Error>| CompileError::DescriptorNotFound {
        pattern: search_pattern(directory),
        source: source.map(Arc::new),
    };

    let entries = fs::read_dir(directory).map_err(|error| not_found(Some(error)))?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_descriptor(path))
        .collect();
    candidates.sort();

    if candidates.len() > 1 {
        warn!(
            target: LOCATOR_TARGET,
            directory = %directory.display(),
            candidates = ?candidates,
            "multiple project descriptors found; using the first"
        );
    }

    let descriptor = candidates.into_iter().next().ok_or_else(|| not_found(None))?;
    let project_name = descriptor
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_default();

    Ok(LocatedProgram {
        descriptor,
        project_name,
    })
}

fn is_descriptor(path: &Path) -> bool {
    path.extension() == Some(OsStr::new(PROJECT_EXTENSION)) && path.is_file()
}
