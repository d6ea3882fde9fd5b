//! External process execution with best-effort diagnostic capture.
//!
//! Every toolchain step goes through a [`Runner`]. The real implementation,
//! [`SystemRunner`], blocks until the child exits and keeps only the first
//! line the child wrote to stderr.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{Error, Result, Stage};

/// Longest diagnostic line kept, in bytes.
const MAX_DIAGNOSTIC_LEN: u64 = 4096;

/// One external command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Toolchain step this command performs
    pub stage: Stage,

    /// Program to run
    pub program: PathBuf,

    /// Arguments passed to the program
    pub args: Vec<OsString>,

    /// Working directory of the child
    pub working_dir: PathBuf,
}

impl Invocation {
    /// Create an invocation with no arguments.
    pub fn new(stage: Stage, program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            stage,
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Outcome of one external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Exit code, or `None` when the child was terminated by a signal
    pub exit_code: Option<i32>,

    /// First line of the child's stderr, if one could be read
    pub diagnostic: Option<String>,
}

impl ProcessResult {
    /// Whether the child exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Return `self` on success, otherwise the error built by `fail`.
    pub fn on_failure<F>(self, fail: F) -> Result<Self>
    where
        F: FnOnce(&ProcessResult) -> Error,
    {
        if self.success() {
            Ok(self)
        } else {
            Err(fail(&self))
        }
    }
}

/// Executes invocations.
pub trait Runner {
    /// Run the invocation to completion.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program could not be started. A non-zero
    /// exit is reported through [`ProcessResult`].
    fn run(&self, invocation: &Invocation) -> Result<ProcessResult>;
}

/// Runs invocations as OS child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessResult> {
        tracing::debug!(
            "spawning `{}` in {}",
            invocation,
            invocation.working_dir.display()
        );

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                invocation_error(
                    invocation,
                    format!(
                        "failed to run {} (working dir: {}): {}",
                        invocation.program.display(),
                        invocation.working_dir.display(),
                        e
                    ),
                )
            })?;

        let diagnostic = child.stderr.take().and_then(read_first_line);
        if let Some(line) = &diagnostic {
            tracing::info!("{}", line);
        }

        let status = child.wait().map_err(|e| {
            invocation_error(
                invocation,
                format!("failed to wait for {}: {}", invocation.program.display(), e),
            )
        })?;

        Ok(ProcessResult {
            exit_code: status.code(),
            diagnostic,
        })
    }
}

fn invocation_error(invocation: &Invocation, diagnostic: String) -> Error {
    Error::ToolchainInvocation {
        stage: invocation.stage,
        diagnostic: Some(diagnostic),
    }
}

/// Read the first line of `stream`, then drain the rest.
///
/// Read errors, invalid UTF-8 and a blank first line yield `None`. A line
/// longer than [`MAX_DIAGNOSTIC_LEN`] is cut off. Draining keeps the child
/// from blocking on a full pipe once the reader stops looking.
fn read_first_line(stream: impl Read) -> Option<String> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    let first = match reader.by_ref().take(MAX_DIAGNOSTIC_LEN).read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let trimmed = line.trim_end_matches(['\r', '\n']);
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    };
    let _ = io::copy(&mut reader, &mut io::sink());
    first
}

/// Run `invocation` and map a non-zero exit to the invocation's stage.
pub(crate) fn run_stage(runner: &impl Runner, invocation: &Invocation) -> Result<ProcessResult> {
    let stage = invocation.stage;
    runner.run(invocation)?.on_failure(|result| {
        tracing::debug!("go {} exited with {:?}", stage, result.exit_code);
        Error::ToolchainInvocation {
            stage,
            diagnostic: result.diagnostic.clone(),
        }
    })
}
