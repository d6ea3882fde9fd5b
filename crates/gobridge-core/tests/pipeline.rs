//! Integration tests for the build task against a scripted `go`.
//!
//! The fake toolchain is a shell script, so these tests only run on Unix.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use gobridge_core::{
    Error, GoBuildTask, HostOs, ProjectLayout, Stage, SystemRunner, Toolchain, MODULE_DESCRIPTOR,
};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// A `GOROOT` whose `bin/go` logs each call and mimics the three subcommands.
struct FakeGo {
    root: TempDir,
    log: PathBuf,
}

impl FakeGo {
    /// `fail` names the step (`init`, `tidy`, `build`) that exits 1, if any.
    fn new(fail: Option<&str>) -> Self {
        Self::new_in(fail, std::env::temp_dir())
    }

    fn new_in(fail: Option<&str>, parent: impl AsRef<Path>) -> Self {
        let root = TempDir::new_in(parent).expect("Failed to create temp directory");
        let bin = root.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let log = root.path().join("calls.log");

        let script = format!(
            r#"#!/bin/sh
printf '%s|%s\n' "$(pwd -P)" "$*" >> '{log}'
case "$1 $2" in
  "mod init") step=init ;;
  "mod tidy") step=tidy ;;
  *) step="$1" ;;
esac
if [ "$step" = '{fail}' ]; then
  echo "go: $step failed on purpose" >&2
  echo "this line is not reported" >&2
  exit 1
fi
case "$step" in
  init) echo "go: creating new go.mod: module $3" >&2; echo "module $3" > go.mod ;;
  build) printf 'binary' > "$3" ;;
esac
exit 0
"#,
            log = log.display(),
            fail = fail.unwrap_or("none"),
        );

        let go = bin.join("go");
        fs::write(&go, script).unwrap();
        fs::set_permissions(&go, fs::Permissions::from_mode(0o755)).unwrap();

        Self { root, log }
    }

    fn toolchain(&self) -> Toolchain {
        Toolchain::from_root(Some(self.root.path().as_os_str())).unwrap()
    }

    /// Logged calls as (working directory, arguments).
    fn calls(&self) -> Vec<(PathBuf, String)> {
        let Ok(content) = fs::read_to_string(&self.log) else {
            return Vec::new();
        };
        content
            .lines()
            .map(|line| {
                let (dir, args) = line.split_once('|').unwrap();
                (PathBuf::from(dir), args.to_string())
            })
            .collect()
    }

    fn args(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, args)| args).collect()
    }
}

/// A project directory with the conventional layout already generated.
struct TestProject {
    dir: TempDir,
    layout: ProjectLayout,
}

impl TestProject {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let layout = ProjectLayout::with_name(dir.path(), "calc");
        fs::create_dir_all(&layout.generated_root).unwrap();
        fs::write(layout.generated_root.join("calc_parser.go"), "package parser\n").unwrap();
        fs::create_dir_all(&layout.source_root).unwrap();
        fs::write(layout.source_root.join("main.go"), "package main\n").unwrap();
        Self { dir, layout }
    }

    fn descriptor(&self) -> PathBuf {
        self.layout.generated_root.join(MODULE_DESCRIPTOR)
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().expect("Failed to canonicalize")
}

/// Every file under `dir`, for before/after comparisons.
fn snapshot(dir: &Path) -> Vec<PathBuf> {
    let mut entries = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(next) = pending.pop() {
        for entry in fs::read_dir(&next).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path.clone());
            }
            entries.push(path);
        }
    }
    entries.sort();
    entries
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_unset_goroot_writes_nothing() {
    let project = TestProject::new();
    let before = snapshot(project.dir.path());

    let err = Toolchain::from_root(None).unwrap_err();

    assert!(matches!(err, Error::Configuration(_)));
    assert_eq!(snapshot(project.dir.path()), before);
    assert!(!project.descriptor().exists());
}

#[test]
fn test_fresh_module_is_initialized_and_tidied() {
    let go = FakeGo::new(None);
    let project = TestProject::new();
    let task = GoBuildTask::new(project.layout.clone());

    let report = task.prepare_module_with(&go.toolchain(), &SystemRunner).unwrap();

    assert!(report.module_created);
    assert_eq!(go.args(), ["mod init calc-generated", "mod tidy"]);
    assert_eq!(
        fs::read_to_string(project.descriptor()).unwrap(),
        "module calc-generated\n"
    );
}

#[test]
fn test_tidy_failure_stops_before_build() {
    let go = FakeGo::new(Some("tidy"));
    let project = TestProject::new();
    fs::write(project.descriptor(), "module calc-generated\n").unwrap();

    let err = GoBuildTask::new(project.layout.clone())
        .run_with(&go.toolchain(), &SystemRunner)
        .unwrap_err();

    match err {
        Error::ToolchainInvocation { stage, diagnostic } => {
            assert_eq!(stage, Stage::Tidy);
            assert_eq!(diagnostic.as_deref(), Some("go: tidy failed on purpose"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(go.args(), ["mod tidy"]);
    assert!(!project.layout.output_dir.join("calc").exists());
}

#[test]
fn test_successful_build_runs_in_source_root() {
    let go = FakeGo::new(None);
    let project = TestProject::new();

    let report = GoBuildTask::new(project.layout.clone())
        .with_host(HostOs::Other)
        .run_with(&go.toolchain(), &SystemRunner)
        .unwrap();

    let artifact = project.layout.output_dir.join("calc");
    assert_eq!(report.artifact.as_deref(), Some(artifact.as_path()));
    assert_eq!(fs::read_to_string(&artifact).unwrap(), "binary");

    let calls = go.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].0, canonical(&project.layout.generated_root));
    assert_eq!(calls[1].0, canonical(&project.layout.generated_root));
    assert_eq!(calls[2].0, canonical(&project.layout.source_root));
    assert_ne!(calls[2].0, canonical(&project.layout.generated_root));
    assert_eq!(calls[2].1, format!("build -o {}", artifact.display()));
}

#[test]
fn test_relative_goroot_and_output_dir() {
    let go = FakeGo::new_in(None, ".");
    let out = TempDir::new_in(".").expect("Failed to create temp directory");
    let project = TestProject::new();
    let layout = project.layout.clone().output_dir(out.path().join("dist"));
    assert!(go.root.path().is_relative());
    assert!(layout.output_dir.is_relative());

    let toolchain = Toolchain::from_root(Some(go.root.path().as_os_str())).unwrap();
    let report = GoBuildTask::new(layout)
        .with_host(HostOs::Other)
        .run_with(&toolchain, &SystemRunner)
        .unwrap();

    assert!(report.toolchain.is_absolute());
    let artifact = report.artifact.unwrap();
    assert!(artifact.is_absolute());
    assert_eq!(fs::read_to_string(&artifact).unwrap(), "binary");
    assert!(out.path().join("dist/calc").exists());
}

#[test]
fn test_windows_host_names_binary_exe() {
    let go = FakeGo::new(None);
    let project = TestProject::new();

    let report = GoBuildTask::new(project.layout.clone())
        .with_host(HostOs::from_name("Windows 11"))
        .run_with(&go.toolchain(), &SystemRunner)
        .unwrap();

    let artifact = project.layout.output_dir.join("calc.exe");
    assert_eq!(report.artifact, Some(artifact.clone()));
    assert!(artifact.exists());
}

#[test]
fn test_rerun_skips_init_but_tidies_again() {
    let go = FakeGo::new(None);
    let project = TestProject::new();
    let task = GoBuildTask::new(project.layout.clone()).with_host(HostOs::Other);

    let first = task.run_with(&go.toolchain(), &SystemRunner).unwrap();
    let second = task.run_with(&go.toolchain(), &SystemRunner).unwrap();

    assert!(first.module_created);
    assert!(!second.module_created);
    let args = go.args();
    assert_eq!(args.iter().filter(|a| a.starts_with("mod init")).count(), 1);
    assert_eq!(args.iter().filter(|a| *a == "mod tidy").count(), 2);
    assert_eq!(args.iter().filter(|a| a.starts_with("build")).count(), 2);
}

#[test]
fn test_init_failure_reports_first_line() {
    let go = FakeGo::new(Some("init"));
    let project = TestProject::new();

    let err = GoBuildTask::new(project.layout.clone())
        .run_with(&go.toolchain(), &SystemRunner)
        .unwrap_err();

    assert_eq!(err.to_string(), "go init failed: go: init failed on purpose");
    assert_eq!(go.args(), ["mod init calc-generated"]);
    assert!(!project.descriptor().exists());
}

#[test]
fn test_build_failure() {
    let go = FakeGo::new(Some("build"));
    let project = TestProject::new();

    let err = GoBuildTask::new(project.layout.clone())
        .with_host(HostOs::Other)
        .run_with(&go.toolchain(), &SystemRunner)
        .unwrap_err();

    assert!(matches!(err, Error::ToolchainInvocation { stage: Stage::Build, .. }));
    assert!(project.descriptor().exists());
    assert!(!project.layout.output_dir.join("calc").exists());
}
