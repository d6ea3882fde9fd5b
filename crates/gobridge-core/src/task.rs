//! The build task: locate the toolchain, prepare the generated module, build.

use std::path::PathBuf;

use serde::Serialize;

use crate::build::{build, HostOs};
use crate::error::Result;
use crate::layout::ProjectLayout;
use crate::module::{ensure_module, InitOutcome};
use crate::process::{Runner, SystemRunner};
use crate::toolchain::Toolchain;

/// Summary of a task run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Path of the `go` executable used
    pub toolchain: PathBuf,

    /// Whether this run created `go.mod`
    pub module_created: bool,

    /// Path of the built binary, absent when only the module was prepared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
}

/// Orchestrates one build.
///
/// Steps run strictly in order and the first failure aborts the run:
/// toolchain lookup, `go mod init` (when needed), `go mod tidy`, `go build`.
#[derive(Debug, Clone)]
pub struct GoBuildTask {
    layout: ProjectLayout,
    host: HostOs,
}

impl GoBuildTask {
    /// Create a task for the given layout, targeting the current host.
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            host: HostOs::current(),
        }
    }

    /// Name the binary for a different host.
    pub fn with_host(mut self, host: HostOs) -> Self {
        self.host = host;
        self
    }

    /// Get the layout.
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Run the whole task with the toolchain from `GOROOT`.
    pub fn run(&self) -> Result<BuildReport> {
        let toolchain = Toolchain::from_env()?;
        self.run_with(&toolchain, &SystemRunner)
    }

    /// Prepare the module and build the binary.
    pub fn run_with(&self, toolchain: &Toolchain, runner: &impl Runner) -> Result<BuildReport> {
        let mut report = self.prepare_module_with(toolchain, runner)?;

        let artifact = build(
            toolchain,
            runner,
            &self.layout.source_root,
            &self.layout.output_dir,
            &self.layout.project_name,
            self.host,
        )?;
        report.artifact = Some(artifact);

        Ok(report)
    }

    /// Run only the module step with the toolchain from `GOROOT`.
    pub fn prepare_module(&self) -> Result<BuildReport> {
        let toolchain = Toolchain::from_env()?;
        self.prepare_module_with(&toolchain, &SystemRunner)
    }

    /// Initialize the generated module if needed, then tidy it.
    pub fn prepare_module_with(
        &self,
        toolchain: &Toolchain,
        runner: &impl Runner,
    ) -> Result<BuildReport> {
        let outcome = ensure_module(
            toolchain,
            runner,
            &self.layout.generated_root,
            &self.layout.module_name,
        )?;

        Ok(BuildReport {
            toolchain: toolchain.go_path().to_path_buf(),
            module_created: outcome == InitOutcome::Created,
            artifact: None,
        })
    }
}
