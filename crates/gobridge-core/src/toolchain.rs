//! Go toolchain location.
//!
//! Resolves the `go` executable from the installation root named by `GOROOT`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the Go installation root.
pub const GOROOT_VAR: &str = "GOROOT";

/// Candidate executable names under `<root>/bin`, in lookup order.
const EXECUTABLE_NAMES: [&str; 2] = ["go", "go.exe"];

/// A resolved Go toolchain.
///
/// Resolve it once per task run and pass it to every component that invokes
/// `go`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Absolute path to the `go` executable
    go_path: PathBuf,
}

impl Toolchain {
    /// Resolve the toolchain from the `GOROOT` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the variable is unset or blank, or
    /// if no `go` executable exists under its `bin` directory.
    pub fn from_env() -> Result<Self> {
        Self::from_root(std::env::var_os(GOROOT_VAR).as_deref())
    }

    /// Resolve the toolchain from an explicit installation root value.
    ///
    /// `None` behaves like an unset variable. A relative root is resolved
    /// against the current directory, since every `go` step runs elsewhere.
    pub fn from_root(root: Option<&OsStr>) -> Result<Self> {
        let root = match root {
            Some(root) if !root.to_string_lossy().trim().is_empty() => std::path::absolute(root)?,
            Some(_) => {
                return Err(Error::Configuration(format!("{} is empty", GOROOT_VAR)));
            }
            None => {
                return Err(Error::Configuration(format!("{} is not set", GOROOT_VAR)));
            }
        };

        let go_path = Self::find_executable(&root.join("bin")).ok_or_else(|| {
            Error::Configuration(format!(
                "go executable not found under {} ({}={})",
                root.join("bin").display(),
                GOROOT_VAR,
                root.display()
            ))
        })?;

        tracing::info!("go executable path: {}", go_path.display());

        Ok(Self { go_path })
    }

    /// Get the path to the `go` executable.
    pub fn go_path(&self) -> &Path {
        &self.go_path
    }

    /// Find the first existing executable name in `bin_dir`.
    fn find_executable(bin_dir: &Path) -> Option<PathBuf> {
        EXECUTABLE_NAMES
            .iter()
            .map(|name| bin_dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}
