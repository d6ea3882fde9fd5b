//! Toolchain command implementation for gobridge CLI.

use gobridge_core::Toolchain;

use crate::build::CliResult;

/// Print the `go` executable resolved from `GOROOT`.
pub fn execute() -> CliResult {
    let toolchain = Toolchain::from_env()?;
    println!("{}", toolchain.go_path().display());
    Ok(())
}
