//! Go build orchestration for ANTLR-generated parsers.
//!
//! This crate provides:
//! - Toolchain lookup from `GOROOT`
//! - Module preparation for the generated sources (`go mod init` / `go mod tidy`)
//! - Binary builds of the hand-written sources (`go build`)
//! - A [`GoBuildTask`] running all of the above in order

pub mod build;
pub mod error;
pub mod layout;
pub mod module;
pub mod process;
pub mod task;
pub mod toolchain;

#[cfg(test)]
mod testutil;

pub use build::{output_name, HostOs};
pub use error::{DirectoryRole, Error, Result, Stage};
pub use layout::ProjectLayout;
pub use module::{ensure_module, init_module, tidy_module, InitOutcome, MODULE_DESCRIPTOR};
pub use process::{Invocation, ProcessResult, Runner, SystemRunner};
pub use task::{BuildReport, GoBuildTask};
pub use toolchain::{Toolchain, GOROOT_VAR};
