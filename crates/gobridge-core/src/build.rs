//! `go build` invocation.
//!
//! Compiles the hand-written sources into a single binary. The binary name
//! depends on the host OS, which is passed in explicitly so Windows naming can
//! be checked from any machine.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DirectoryRole, Result, Stage};
use crate::layout::require_dir;
use crate::process::{run_stage, Invocation, Runner};
use crate::toolchain::Toolchain;

/// Operating-system family that decides the executable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// Any Windows-family system; executables end in `.exe`.
    Windows,
    /// Everything else; executables have no suffix.
    Other,
}

impl HostOs {
    /// The host this process runs on.
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Classify an OS name. Any name containing `windows`, ignoring case, is
    /// Windows-family.
    pub fn from_name(name: &str) -> Self {
        if name.to_ascii_lowercase().contains("windows") {
            HostOs::Windows
        } else {
            HostOs::Other
        }
    }

    /// Suffix appended to executable names.
    pub fn executable_suffix(self) -> &'static str {
        match self {
            HostOs::Windows => ".exe",
            HostOs::Other => "",
        }
    }
}

/// Get the platform-specific binary name.
pub fn output_name(project_name: &str, host: HostOs) -> String {
    format!("{}{}", project_name, host.executable_suffix())
}

/// Build the sources in `source_root` into `output_dir`.
///
/// Returns the absolute path of the written binary. Relative directories are
/// resolved against the current directory before `go` runs in `source_root`.
///
/// # Errors
///
/// Returns an error if:
/// - `source_root` does not exist
/// - `output_dir` cannot be created
/// - `go build` exits non-zero (stage `build`)
pub fn build(
    toolchain: &Toolchain,
    runner: &impl Runner,
    source_root: &Path,
    output_dir: &Path,
    project_name: &str,
    host: HostOs,
) -> Result<PathBuf> {
    require_dir(source_root, DirectoryRole::Sources)?;
    let source_root = std::path::absolute(source_root)?;
    let output_dir = std::path::absolute(output_dir)?;
    tracing::info!("go code path: {}", source_root.display());

    fs::create_dir_all(&output_dir)?;
    let output_path = output_dir.join(output_name(project_name, host));

    let invocation = Invocation::new(Stage::Build, toolchain.go_path(), &source_root)
        .args(["build", "-o"])
        .arg(&output_path);
    run_stage(runner, &invocation).inspect_err(|_| {
        tracing::error!("go build failed");
    })?;

    tracing::info!("built {}", output_path.display());
    Ok(output_path)
}
