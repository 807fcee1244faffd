//! Program locations and protocol constants.
//!
//! Everything the capture, render and clipboard paths hand to the operating
//! system is named here so the mock runner and the real code agree on it.

/// macOS screen-capture tool. Absolute so a shadowing `PATH` entry cannot
/// replace it.
pub const SCREENCAPTURE_BIN: &str = "/usr/sbin/screencapture";

/// AppleScript interpreter used for window queries and the clipboard.
pub const OSASCRIPT_BIN: &str = "osascript";

/// WezTerm CLI, optional.
pub const WEZTERM_BIN: &str = "wezterm";

/// `screencapture` flag: do not play the shutter sound.
pub const FLAG_NO_SOUND: &str = "-x";

/// `screencapture` flag: omit the window shadow.
pub const FLAG_NO_SHADOW: &str = "-o";

/// `screencapture` flag: capture the window with the following id.
pub const FLAG_WINDOW_ID: &str = "-l";

/// `screencapture` flag: capture the following `x,y,w,h` rectangle.
pub const FLAG_REGION: &str = "-R";

/// Default file name prefix, giving `shot-<millis>.png`.
pub const DEFAULT_FILENAME_PREFIX: &str = "shot";

/// Prefix of the per-capture temporary directory.
pub const TEMP_DIR_PREFIX: &str = "appshot-";

/// Extension of every capture.
pub const CAPTURE_EXTENSION: &str = "png";

/// MIME type of every capture.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Number of base64 characters shown by the auto-mode preview.
pub const BASE64_PREVIEW_LEN: usize = 80;
