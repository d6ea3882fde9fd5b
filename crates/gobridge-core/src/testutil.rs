//! Test doubles for the toolchain and process runner.

use std::cell::RefCell;
use std::fs;

use tempfile::TempDir;

use crate::error::{Result, Stage};
use crate::module::descriptor_path;
use crate::process::{Invocation, ProcessResult, Runner};
use crate::toolchain::Toolchain;

/// Create an installation root holding an empty `bin/go`.
///
/// Keep the returned directory alive for as long as the toolchain is used.
pub fn fake_toolchain() -> (TempDir, Toolchain) {
    let root = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(root.path().join("bin")).unwrap();
    fs::write(root.path().join("bin").join("go"), "").unwrap();
    let toolchain = Toolchain::from_root(Some(root.path().as_os_str())).unwrap();
    (root, toolchain)
}

/// Records invocations instead of spawning processes.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    failure: Option<(Stage, String)>,
    simulate: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the files the real subcommands would write: `go.mod` on init,
    /// the `-o` target on build.
    pub fn simulating(mut self) -> Self {
        self.simulate = true;
        self
    }

    /// Exit with code 1 and `diagnostic` on stderr whenever `stage` runs.
    pub fn failing(mut self, stage: Stage, diagnostic: &str) -> Self {
        self.failure = Some((stage, diagnostic.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.calls.borrow().iter().map(|c| c.stage).collect()
    }
}

impl Runner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessResult> {
        self.calls.borrow_mut().push(invocation.clone());

        if let Some((stage, diagnostic)) = &self.failure {
            if *stage == invocation.stage {
                return Ok(ProcessResult {
                    exit_code: Some(1),
                    diagnostic: Some(diagnostic.clone()),
                });
            }
        }

        if self.simulate {
            match invocation.stage {
                Stage::Init => {
                    fs::write(descriptor_path(&invocation.working_dir), "module fake\n")?;
                }
                Stage::Build => {
                    let output = invocation
                        .args
                        .iter()
                        .skip_while(|arg| *arg != "-o")
                        .nth(1)
                        .expect("build invocation without -o");
                    fs::write(output, "")?;
                }
                Stage::Tidy => {}
            }
        }

        Ok(ProcessResult {
            exit_code: Some(0),
            diagnostic: None,
        })
    }
}
