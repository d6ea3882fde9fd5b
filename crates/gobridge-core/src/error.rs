//! Error types for gobridge-core.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::toolchain::GOROOT_VAR;

/// Result type for gobridge-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The toolchain step that was running when an invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `go mod init`
    Init,
    /// `go mod tidy`
    Tidy,
    /// `go build`
    Build,
}

impl Stage {
    /// Short lowercase name, as shown in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Tidy => "tidy",
            Stage::Build => "build",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which source directory a [`Error::MissingDirectory`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    /// Output of the grammar generator.
    GeneratedSources,
    /// Hand-written Go sources.
    Sources,
}

impl fmt::Display for DirectoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryRole::GeneratedSources => f.write_str("generated source root"),
            DirectoryRole::Sources => f.write_str("source root"),
        }
    }
}

/// Errors that can occur in gobridge-core.
#[derive(Debug, Error)]
pub enum Error {
    /// The toolchain location or task configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A `go` subcommand exited non-zero or could not be started.
    #[error("go {stage} failed{}", diagnostic.as_ref().map(|d| format!(": {}", d)).unwrap_or_default())]
    ToolchainInvocation {
        stage: Stage,
        diagnostic: Option<String>,
    },

    /// A directory the task reads from does not exist.
    #[error("{role} not found: {}", path.display())]
    MissingDirectory { role: DirectoryRole, path: PathBuf },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Render the error together with a suggestion for fixing it.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::Configuration(message) if message.contains(GOROOT_VAR) => {
                match suggested_goroot() {
                    Some(root) => format!(
                        "set {} to your Go installation root (a `go` on PATH suggests {})",
                        GOROOT_VAR,
                        root.display()
                    ),
                    None => format!(
                        "install Go and set {} to its installation root",
                        GOROOT_VAR
                    ),
                }
            }
            Error::Configuration(_) => "check the task settings".to_string(),
            Error::ToolchainInvocation {
                stage: Stage::Init | Stage::Tidy,
                ..
            } => "check the generated sources and that module downloads are reachable".to_string(),
            Error::ToolchainInvocation {
                stage: Stage::Build,
                ..
            } => "run `go build` in the source root to see the full compiler output".to_string(),
            Error::MissingDirectory {
                role: DirectoryRole::GeneratedSources,
                ..
            } => "run the grammar generator before this task".to_string(),
            Error::MissingDirectory { .. } => "check the --source-dir setting".to_string(),
            Error::Io(_) => return self.to_string(),
        };
        format!("{}\n  hint: {}", self, hint)
    }
}

/// Guess an installation root from a `go` found on PATH.
///
/// `<root>/bin/go` is the layout of every Go distribution, so the root is two
/// levels above the resolved binary.
fn suggested_goroot() -> Option<PathBuf> {
    let go = which::which("go").ok()?;
    let go = go.canonicalize().unwrap_or(go);
    go.parent().and_then(Path::parent).map(Path::to_path_buf)
}
