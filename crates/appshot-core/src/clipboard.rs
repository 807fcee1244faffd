//! Copying a captured PNG to the macOS clipboard

use std::{path::Path, sync::Arc};

use tracing::info;

use crate::{
    capture::{constants::OSASCRIPT_BIN, window_query::osascript_args},
    error::AppshotResult,
    model::PlatformInfo,
    process::ProcessRunner,
};

/// Marker unique to [`CLIPBOARD_SCRIPT`]
pub const CLIPBOARD_MARKER: &str = "set the clipboard";

/// Reads `item 1 of argv` as PNG data and puts it on the clipboard.
pub const CLIPBOARD_SCRIPT: &str = r#"
on run argv
  set thePath to POSIX file (item 1 of argv)
  set pngData to (read thePath as «class PNGf»)
  tell application "System Events" to set the clipboard to pngData
  return "ok"
end run"#;

/// Clipboard writer
#[derive(Clone)]
pub struct Clipboard {
    runner:   Arc<dyn ProcessRunner>,
    platform: PlatformInfo,
}

impl Clipboard {
    /// Creates a clipboard writer for `platform`
    pub fn new(runner: Arc<dyn ProcessRunner>, platform: PlatformInfo) -> Self {
        Self { runner, platform }
    }

    /// Replaces the clipboard contents with the PNG at `path`
    pub async fn copy_png(&self, path: &Path) -> AppshotResult<()> {
        self.platform.ensure_supported()?;
        let path_arg = path.to_string_lossy();
        self.runner
            .run(OSASCRIPT_BIN, &osascript_args(CLIPBOARD_SCRIPT, &path_arg), None)
            .await?;
        info!(path = %path.display(), "copied PNG to clipboard");
        Ok(())
    }
}
