//! Harness for driving `appshot_cli::run` against a scripted backend

use std::sync::Arc;

use appshot_core::{capture::ShotBackend, model::PlatformInfo, process::MockRunner};
use tempfile::TempDir;

/// Captured result of one CLI invocation
#[derive(Debug)]
pub struct CliRun {
    pub code:   u8,
    pub stdout: String,
    pub stderr: String,
}

/// A mock macOS backend plus a scratch `--out-dir`
pub struct CliHarness {
    pub runner:  Arc<MockRunner>,
    pub backend: ShotBackend,
    pub out_dir: TempDir,
}

impl CliHarness {
    pub fn new(runner: MockRunner) -> Self {
        Self::on_platform(runner, "macos")
    }

    pub fn on_platform(runner: MockRunner, os: &str) -> Self {
        let runner = Arc::new(runner);
        Self {
            backend: ShotBackend::new(runner.clone(), PlatformInfo::new(os)),
            runner,
            out_dir: tempfile::tempdir().expect("create out dir"),
        }
    }

    /// `--out-dir` value pointing at the scratch directory
    pub fn out_dir_arg(&self) -> String {
        self.out_dir.path().to_string_lossy().into_owned()
    }

    /// Runs `appshot <args>`
    pub async fn run(&self, args: &[&str]) -> CliRun {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let argv = std::iter::once("appshot").chain(args.iter().copied());
        let code = appshot_cli::run(argv, &self.backend, &mut stdout, &mut stderr).await;
        CliRun {
            code,
            stdout: String::from_utf8(stdout).expect("utf-8 stdout"),
            stderr: String::from_utf8(stderr).expect("utf-8 stderr"),
        }
    }
}
