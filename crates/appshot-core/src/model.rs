//! Data models shared by the capture and rendering pipeline
//!
//! - [`CaptureRequest`] and its builder
//! - [`WindowLocator`] / [`WindowFrame`] for scoping a capture
//! - [`TerminalKind`], [`DisplayMode`] and [`RenderOutcome`] for rendering
//! - [`PlatformInfo`] for the macOS guard

use std::{fmt, path::PathBuf, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    capture::constants::DEFAULT_FILENAME_PREFIX,
    error::{AppshotError, AppshotResult},
};

/// One capture invocation
///
/// Construct with [`CaptureRequest::builder`]; the application name is
/// guaranteed non-empty once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    application_name: String,
    output_directory: Option<PathBuf>,
    filename_prefix:  String,
}

impl CaptureRequest {
    /// Starts a builder for capturing `application_name`
    ///
    /// # Examples
    ///
    /// ```
    /// use appshot_core::model::CaptureRequest;
    ///
    /// let request = CaptureRequest::builder("Notes")
    ///     .output_directory("/tmp/shots")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(request.application_name(), "Notes");
    /// assert_eq!(request.filename_prefix(), "shot");
    /// ```
    pub fn builder(application_name: impl Into<String>) -> CaptureRequestBuilder {
        CaptureRequestBuilder {
            application_name: application_name.into(),
            output_directory: None,
            filename_prefix:  DEFAULT_FILENAME_PREFIX.to_string(),
        }
    }

    /// Exact, case-sensitive name of the application to capture
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// Caller-chosen output directory, if any
    pub fn output_directory(&self) -> Option<&PathBuf> {
        self.output_directory.as_ref()
    }

    /// Prefix for the generated file name
    pub fn filename_prefix(&self) -> &str {
        &self.filename_prefix
    }
}

/// Builder for [`CaptureRequest`]
#[derive(Debug, Clone)]
pub struct CaptureRequestBuilder {
    application_name: String,
    output_directory: Option<PathBuf>,
    filename_prefix:  String,
}

impl CaptureRequestBuilder {
    /// Writes the capture into `dir` instead of a fresh temp directory
    pub fn output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(dir.into());
        self
    }

    /// Same as [`Self::output_directory`] but accepts an optional value
    pub fn maybe_output_directory(mut self, dir: Option<PathBuf>) -> Self {
        self.output_directory = dir;
        self
    }

    /// Overrides the default `shot` file name prefix
    pub fn filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }

    /// Validates and builds the request
    pub fn build(self) -> AppshotResult<CaptureRequest> {
        if self.application_name.trim().is_empty() {
            return Err(AppshotError::validation("app", "application name must not be empty"));
        }
        if self.filename_prefix.is_empty() || self.filename_prefix.contains(['/', '\\']) {
            return Err(AppshotError::validation(
                "filename_prefix",
                "prefix must be non-empty and contain no path separators",
            ));
        }
        Ok(CaptureRequest {
            application_name: self.application_name,
            output_directory: self.output_directory,
            filename_prefix:  self.filename_prefix,
        })
    }
}

/// Pixel rectangle of a window in global screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WindowFrame {
    /// Left edge
    pub x:      i32,
    /// Top edge
    pub y:      i32,
    /// Width
    pub width:  i32,
    /// Height
    pub height: i32,
}

impl fmt::Display for WindowFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// How a capture is scoped to a single window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowLocator {
    /// Opaque window-server id
    WindowId(String),
    /// Screen rectangle covering the window
    Frame(WindowFrame),
}

/// Inline-image capable terminal detected from the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TerminalKind {
    /// No known inline image protocol
    None,
    /// iTerm2 (OSC 1337)
    Iterm,
    /// kitty graphics protocol
    Kitty,
    /// WezTerm, via `wezterm imgcat`
    Wezterm,
}

impl TerminalKind {
    /// Returns the kind as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalKind::None => "none",
            TerminalKind::Iterm => "iterm",
            TerminalKind::Kitty => "kitty",
            TerminalKind::Wezterm => "wezterm",
        }
    }

    /// True for every kind except [`TerminalKind::None`]
    pub fn supports_inline(&self) -> bool {
        !matches!(self, TerminalKind::None)
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Requested output style for a captured image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Inline when possible, otherwise path plus base64 preview
    #[default]
    Auto,
    /// Inline when possible, otherwise path
    Inline,
    /// Print the file path
    Path,
    /// Print the whole file as base64
    Base64,
}

impl DisplayMode {
    /// Returns the mode as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Auto => "auto",
            DisplayMode::Inline => "inline",
            DisplayMode::Path => "path",
            DisplayMode::Base64 => "base64",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = AppshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(DisplayMode::Auto),
            "inline" => Ok(DisplayMode::Inline),
            "path" => Ok(DisplayMode::Path),
            "base64" => Ok(DisplayMode::Base64),
            other => Err(AppshotError::validation(
                "display",
                format!("unknown display mode '{other}' (expected inline, path, base64 or auto)"),
            )),
        }
    }
}

/// What the renderer actually did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutcome {
    /// Mode that produced the output
    pub display:       DisplayMode,
    /// Whether an inline image sequence was written
    pub inline:        bool,
    /// Terminal used (or detected, for the auto fallback)
    pub method:        Option<TerminalKind>,
    /// Length of the full base64 text, base64 mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64_length: Option<usize>,
    /// Truncated preview, auto fallback only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64_prefix: Option<String>,
}

impl RenderOutcome {
    /// Outcome for a plain path line
    pub fn path() -> Self {
        Self {
            display:       DisplayMode::Path,
            inline:        false,
            method:        None,
            base64_length: None,
            base64_prefix: None,
        }
    }

    /// Outcome for a successful inline render under `requested` mode
    pub fn inline(requested: DisplayMode, kind: TerminalKind) -> Self {
        Self {
            display:       requested,
            inline:        true,
            method:        Some(kind),
            base64_length: None,
            base64_prefix: None,
        }
    }
}

/// Operating system the process runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlatformInfo {
    /// Operating system name as reported by `std::env::consts::OS`
    pub os: String,
}

impl PlatformInfo {
    /// Creates a new PlatformInfo instance
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }

    /// Whether window capture can run here
    pub fn is_supported(&self) -> bool {
        self.os == "macos"
    }

    /// Fails with [`AppshotError::Platform`] off macOS
    pub fn ensure_supported(&self) -> AppshotResult<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(AppshotError::Platform {
                os: self.os.clone(),
            })
        }
    }
}
