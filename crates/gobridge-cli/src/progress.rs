//! Progress output for toolchain steps.

use gobridge_core::{Invocation, ProcessResult, Runner, Stage, SystemRunner};

use crate::colors;

/// Prints one progress line per toolchain step, then delegates to
/// [`SystemRunner`].
pub struct ProgressRunner;

impl ProgressRunner {
    fn label(stage: Stage) -> &'static str {
        match stage {
            Stage::Init => "Initializing generated module",
            Stage::Tidy => "Tidying generated module",
            Stage::Build => "Compiling binary",
        }
    }
}

impl Runner for ProgressRunner {
    fn run(&self, invocation: &Invocation) -> gobridge_core::Result<ProcessResult> {
        print!(
            "{}  ◆ {}{} ... ",
            colors::BLUE,
            Self::label(invocation.stage),
            colors::RESET
        );
        colors::flush_stdout();

        let result = SystemRunner.run(invocation);

        match &result {
            Ok(r) if r.success() => println!("{}✓{}", colors::GREEN, colors::RESET),
            _ => println!("{}✗{}", colors::RED, colors::RESET),
        }

        result
    }
}
