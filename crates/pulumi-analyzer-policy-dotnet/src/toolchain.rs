//! Resolves the build tool executable on the host search path.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::CompileError;

/// Executable lookup over a search path.
///
/// [`Toolchain::from_env`] reads `PATH`; tests inject their own directories
/// through [`Toolchain::with_search_path`].
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    search_path: Option<OsString>,
}

impl Toolchain {
    /// Looks executables up on the process `PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            search_path: env::var_os("PATH"),
        }
    }

    /// Looks executables up on an explicit search path.
    #[must_use]
    pub const fn with_search_path(search_path: OsString) -> Self {
        Self {
            search_path: Some(search_path),
        }
    }

    /// Finds `name` on the search path.
    ///
    /// A `name` containing a path separator is checked as given.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::ToolNotFound`] when no executable matches.
    pub fn find_executable(&self, name: &str) -> Result<PathBuf, CompileError> {
        let not_found = || CompileError::ToolNotFound {
            tool: name.to_owned(),
        };

        let requested = Path::new(name);
        if requested.components().count() > 1 || requested.is_absolute() {
            return candidates(requested)
                .into_iter()
                .find(|candidate| is_executable(candidate))
                .ok_or_else(not_found);
        }

        let Some(search_path) = self.search_path.as_ref() else {
            return Err(not_found());
        };

        env::split_paths(search_path)
            .filter(|directory| !directory.as_os_str().is_empty())
            .flat_map(|directory| candidates(&directory.join(name)))
            .find(|candidate| is_executable(candidate))
            .ok_or_else(not_found)
    }
}

#[cfg(windows)]
fn candidates(base: &Path) -> Vec<PathBuf> {
    let mut paths = vec![base.to_path_buf()];
    if base.extension().is_none() {
        let extensions = env::var("PATHEXT").unwrap_or_else(|_| String::from(".EXE"));
        paths.extend(
            extensions
                .split(';')
                .filter(|extension| !extension.is_empty())
                .map(|extension| {
                    let mut path = base.as_os_str().to_owned();
                    path.push(extension.to_ascii_lowercase());
                    PathBuf::from(path)
                }),
        );
    }
    paths
}

#[cfg(not(windows))]
fn candidates(base: &Path) -> Vec<PathBuf> {
    vec![base.to_path_buf()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
