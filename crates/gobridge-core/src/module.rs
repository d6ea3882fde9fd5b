//! Go module preparation for generated sources.
//!
//! The generated parser directory has to be a module of its own so the
//! hand-written sources can import it. Preparing it is two steps with
//! different skip rules:
//!
//! 1. [`init_module`] runs `go mod init` only while `go.mod` is absent.
//! 2. [`tidy_module`] runs `go mod tidy` every time, since regenerated
//!    sources may import a different set of packages.

use std::path::{Path, PathBuf};

use crate::error::{DirectoryRole, Error, Result, Stage};
use crate::layout::require_dir;
use crate::process::{run_stage, Invocation, Runner};
use crate::toolchain::Toolchain;

/// File name of the module descriptor.
pub const MODULE_DESCRIPTOR: &str = "go.mod";

/// Outcome of [`init_module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// `go mod init` ran and succeeded.
    Created,
    /// A descriptor was already present; nothing ran.
    AlreadyPresent,
}

/// Path of the module descriptor inside `root`.
pub fn descriptor_path(root: &Path) -> PathBuf {
    root.join(MODULE_DESCRIPTOR)
}

/// Create the module descriptor in `root` unless one exists.
///
/// # Errors
///
/// Returns an error if:
/// - `module_name` is not a valid module path
/// - `root` does not exist
/// - `go mod init` exits non-zero (stage `init`)
pub fn init_module(
    toolchain: &Toolchain,
    runner: &impl Runner,
    root: &Path,
    module_name: &str,
) -> Result<InitOutcome> {
    validate_module_name(module_name)?;
    require_dir(root, DirectoryRole::GeneratedSources)?;

    if descriptor_path(root).exists() {
        tracing::debug!("{} already exists in {}", MODULE_DESCRIPTOR, root.display());
        return Ok(InitOutcome::AlreadyPresent);
    }

    let init = Invocation::new(Stage::Init, toolchain.go_path(), root)
        .args(["mod", "init"])
        .arg(module_name);
    run_stage(runner, &init).inspect_err(|_| {
        tracing::error!("can not init generated src module");
    })?;

    tracing::info!("initialized module {} in {}", module_name, root.display());
    Ok(InitOutcome::Created)
}

/// Reconcile the module's dependencies with its imports.
///
/// # Errors
///
/// Returns an error if `root` does not exist or `go mod tidy` exits
/// non-zero (stage `tidy`).
pub fn tidy_module(toolchain: &Toolchain, runner: &impl Runner, root: &Path) -> Result<()> {
    require_dir(root, DirectoryRole::GeneratedSources)?;

    let tidy = Invocation::new(Stage::Tidy, toolchain.go_path(), root).args(["mod", "tidy"]);
    run_stage(runner, &tidy).inspect_err(|_| {
        tracing::error!("can not tidy generated src module");
    })?;

    Ok(())
}

/// Initialize the module if needed, then tidy it.
pub fn ensure_module(
    toolchain: &Toolchain,
    runner: &impl Runner,
    root: &Path,
    module_name: &str,
) -> Result<InitOutcome> {
    let outcome = init_module(toolchain, runner, root, module_name)?;
    tidy_module(toolchain, runner, root)?;
    Ok(outcome)
}

/// Validate a module path.
///
/// Elements are separated by `/` and may contain ASCII letters, digits and
/// `-._~`.
pub fn validate_module_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Configuration("module name cannot be empty".to_string()));
    }

    for element in name.split('/') {
        if element.is_empty() {
            return Err(Error::Configuration(format!(
                "module name '{}' has an empty path element",
                name
            )));
        }
        if let Some(c) = element
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')))
        {
            return Err(Error::Configuration(format!(
                "module name '{}' contains invalid character {:?}",
                name, c
            )));
        }
    }

    Ok(())
}
