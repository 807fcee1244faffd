//! Shared test utilities for appshot-core integration tests

use std::{path::PathBuf, sync::Arc};

use appshot_core::{
    capture::ShotBackend,
    model::{CaptureRequest, PlatformInfo},
    process::MockRunner,
};
use tempfile::TempDir;

/// A macOS-flavoured backend over a scripted runner, writing into a scratch
/// directory that is removed on drop
pub struct CaptureFixture {
    /// Scratch output directory
    pub dir:     TempDir,
    /// The runner, kept for call inspection
    pub runner:  Arc<MockRunner>,
    /// Backend wired to `runner`
    pub backend: ShotBackend,
}

impl CaptureFixture {
    pub fn new(runner: MockRunner) -> Self {
        let runner = Arc::new(runner);
        let backend = ShotBackend::new(runner.clone(), PlatformInfo::new("macos"));
        Self {
            dir: tempfile::tempdir().expect("create scratch dir"),
            runner,
            backend,
        }
    }

    /// Request for `app` that writes into the scratch directory
    pub fn request(&self, app: &str) -> CaptureRequest {
        CaptureRequest::builder(app)
            .output_directory(self.dir.path())
            .build()
            .expect("valid request")
    }

    /// Files currently in the scratch directory
    #[allow(dead_code)]
    pub fn files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.dir.path())
            .expect("read scratch dir")
            .map(|entry| entry.expect("dir entry").path())
            .collect()
    }
}
