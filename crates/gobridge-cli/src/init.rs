//! Init command implementation for gobridge CLI.
//!
//! Runs only the module step: `go mod init` when `go.mod` is missing, then
//! `go mod tidy`.

use gobridge_core::{GoBuildTask, ProjectLayout, Toolchain};

use crate::build::CliResult;
use crate::colors;
use crate::progress::ProgressRunner;

/// Prepare the generated module of `layout`.
pub fn execute(layout: ProjectLayout, json: bool) -> CliResult {
    let task = GoBuildTask::new(layout);

    if json {
        let report = task.prepare_module()?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let toolchain = Toolchain::from_env()?;

    println!(
        "\n{}gobridge{} - Preparing {}{}{}\n",
        colors::BOLD,
        colors::RESET,
        colors::CYAN,
        task.layout().module_name,
        colors::RESET
    );

    let report = task.prepare_module_with(&toolchain, &ProgressRunner)?;

    println!();
    println!(
        "{}Module:{} {} ({})",
        colors::GREEN,
        colors::RESET,
        task.layout().generated_root.display(),
        if report.module_created {
            "created go.mod"
        } else {
            "existing go.mod"
        }
    );

    Ok(())
}
