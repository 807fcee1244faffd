//! External program execution
//!
//! Everything the crate asks of the operating system (window queries,
//! screen capture, clipboard writes, `wezterm imgcat`) goes through the
//! [`ProcessRunner`] trait. [`SystemRunner`] spawns real processes;
//! [`MockRunner`] scripts their behavior for tests.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::debug;

use crate::error::ProcessError;

pub mod mock;

pub use mock::MockRunner;

/// Collected output of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Whole stdout, decoded as UTF-8 (lossy)
    pub stdout: String,
    /// Whole stderr, decoded as UTF-8 (lossy)
    pub stderr: String,
}

impl ProcessOutput {
    /// Output with the given stdout and empty stderr
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Runs an external program to completion
///
/// Implementations collect stdout and stderr in full before returning (no
/// streaming). A nonzero exit is always an error; a program that cannot be
/// found must be reported as [`ProcessError::NotFound`].
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs `program` with `args`, writing `input` to its stdin if given.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        input: Option<&[u8]>,
    ) -> Result<ProcessOutput, ProcessError>;
}

/// [`ProcessRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a new SystemRunner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        input: Option<&[u8]>,
    ) -> Result<ProcessOutput, ProcessError> {
        debug!(program, ?args, "spawning");

        let mut child = Command::new(program)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| spawn_error(program, source))?;

        if let (Some(bytes), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin.write_all(bytes).await.map_err(|source| ProcessError::Launch {
                program: program.to_string(),
                source,
            })?;
            // Dropping stdin closes the pipe so the child sees EOF.
            drop(stdin);
        }

        let output = child.wait_with_output().await.map_err(|source| ProcessError::Launch {
            program: program.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            debug!(program, stdout_len = stdout.len(), "command succeeded");
            Ok(ProcessOutput { stdout, stderr })
        } else {
            debug!(program, code = ?output.status.code(), "command failed");
            Err(ProcessError::Exited {
                program: program.to_string(),
                code: output.status.code(),
                stdout,
                stderr,
            })
        }
    }
}

fn spawn_error(program: &str, source: std::io::Error) -> ProcessError {
    if source.kind() == std::io::ErrorKind::NotFound {
        ProcessError::NotFound {
            program: program.to_string(),
        }
    } else {
        ProcessError::Launch {
            program: program.to_string(),
            source,
        }
    }
}
