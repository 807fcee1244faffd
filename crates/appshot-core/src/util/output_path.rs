//! Destination paths for captures
//!
//! Files are named `{prefix}-{epochMillis}.png`. Without a caller-supplied
//! directory each capture gets its own `appshot-XXXXXX` directory under the
//! system temp dir. Directories and files outlive the process: cleanup is
//! the caller's job.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::debug;

use crate::{
    capture::constants::{CAPTURE_EXTENSION, TEMP_DIR_PREFIX},
    error::AppshotResult,
    model::CaptureRequest,
};

/// File name for a capture taken at `epoch_millis`
///
/// # Examples
///
/// ```
/// use appshot_core::util::output_path::capture_file_name;
///
/// assert_eq!(capture_file_name("shot", 1700000000123), "shot-1700000000123.png");
/// ```
pub fn capture_file_name(prefix: &str, epoch_millis: i64) -> String {
    format!("{prefix}-{epoch_millis}.{CAPTURE_EXTENSION}")
}

/// Resolves the directory for `request`, creating it if needed
///
/// The result is always absolute; relative directories are resolved against
/// the current working directory.
pub fn prepare_output_dir(request: &CaptureRequest) -> AppshotResult<PathBuf> {
    match request.output_directory() {
        Some(dir) => {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
            Ok(fs::canonicalize(dir)?)
        }
        None => create_capture_dir(),
    }
}

/// Creates a unique, persistent directory under the system temp dir
pub fn create_capture_dir() -> AppshotResult<PathBuf> {
    let dir = tempfile::Builder::new().prefix(TEMP_DIR_PREFIX).tempdir()?.keep();
    debug!(dir = %dir.display(), "created capture directory");
    Ok(dir)
}

/// Full destination path for `request`, stamped with the current time
pub fn allocate_destination(request: &CaptureRequest) -> AppshotResult<PathBuf> {
    let dir = prepare_output_dir(request)?;
    Ok(destination_in(&dir, request.filename_prefix(), Utc::now().timestamp_millis()))
}

fn destination_in(dir: &Path, prefix: &str, epoch_millis: i64) -> PathBuf {
    dir.join(capture_file_name(prefix, epoch_millis))
}
