//! Build command implementation for gobridge CLI.
//!
//! Prepares the generated module and compiles the binary.

use std::time::Instant;

use gobridge_core::{GoBuildTask, ProjectLayout, Toolchain};

use crate::colors;
use crate::progress::ProgressRunner;

/// Result type for CLI operations.
pub type CliResult = anyhow::Result<()>;

/// Build the project described by `layout`.
pub fn execute(layout: ProjectLayout, json: bool) -> CliResult {
    let start = Instant::now();
    let task = GoBuildTask::new(layout);

    if json {
        let report = task.run()?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let toolchain = Toolchain::from_env()?;

    println!(
        "\n{}gobridge{} - Building {}{}{}\n",
        colors::BOLD,
        colors::RESET,
        colors::CYAN,
        task.layout().project_name,
        colors::RESET
    );
    println!(
        "{}  go:{} {}",
        colors::DIM,
        colors::RESET,
        toolchain.go_path().display()
    );

    let report = task.run_with(&toolchain, &ProgressRunner)?;

    // Summary
    println!();
    if let Some(artifact) = &report.artifact {
        println!(
            "{}Built:{} {}",
            colors::GREEN,
            colors::RESET,
            artifact.display()
        );
    }
    println!(
        "{}Module:{} {}",
        colors::DIM,
        colors::RESET,
        if report.module_created {
            "created go.mod"
        } else {
            "existing go.mod"
        }
    );
    println!(
        "{}Time:{} {:.2}s",
        colors::DIM,
        colors::RESET,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
