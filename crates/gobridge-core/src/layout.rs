//! Project directory layout.
//!
//! Derives every path the task touches from the project directory, following
//! the ANTLR plugin conventions:
//!
//! ```text
//! <project>/
//! ├── src/main/go/                  # Hand-written Go sources (build cwd)
//! └── build/
//!     ├── generated-src/antlr/main/ # Generated parser + go.mod
//!     └── <project>[.exe]           # Output binary
//! ```

use std::path::{Path, PathBuf};

use crate::error::{DirectoryRole, Error, Result};

/// Suffix appended to the project name to form the generated module's name.
pub const GENERATED_MODULE_SUFFIX: &str = "-generated";

/// Paths and names for one build.
///
/// Constructing a layout never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Project name, also the output binary's base name.
    pub project_name: String,

    /// Module name passed to `go mod init`.
    pub module_name: String,

    /// Directory holding the generated sources.
    pub generated_root: PathBuf,

    /// Directory holding the hand-written sources.
    pub source_root: PathBuf,

    /// Directory the binary is written to.
    pub output_dir: PathBuf,
}

impl ProjectLayout {
    /// Create the conventional layout for a project directory.
    ///
    /// The project name is the directory's final component.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if no name can be derived from the
    /// directory (e.g. the filesystem root).
    pub fn from_project_dir(project_dir: &Path) -> Result<Self> {
        let project_dir = std::path::absolute(project_dir)?;
        let project_name = project_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "cannot derive a project name from {}",
                    project_dir.display()
                ))
            })?;
        Ok(Self::with_name(&project_dir, project_name))
    }

    /// Create the conventional layout with an explicit project name.
    pub fn with_name(project_dir: &Path, project_name: impl Into<String>) -> Self {
        let project_name = project_name.into();
        let build_dir = project_dir.join("build");

        Self {
            module_name: format!("{}{}", project_name, GENERATED_MODULE_SUFFIX),
            project_name,
            generated_root: build_dir.join("generated-src").join("antlr").join("main"),
            source_root: project_dir.join("src").join("main").join("go"),
            output_dir: build_dir,
        }
    }

    /// Override the module name.
    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    /// Override the generated source root.
    pub fn generated_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.generated_root = path.into();
        self
    }

    /// Override the hand-written source root.
    pub fn source_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_root = path.into();
        self
    }

    /// Override the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }
}

/// Check that `path` is an existing directory.
pub(crate) fn require_dir(path: &Path, role: DirectoryRole) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::MissingDirectory {
            role,
            path: path.to_path_buf(),
        })
    }
}
