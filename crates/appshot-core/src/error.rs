//! Error types for capture and rendering operations
//!
//! Two layers: [`ProcessError`] describes what happened to a single external
//! program, and [`AppshotError`] is what the public operations surface. Each
//! `AppshotError` carries an actionable hint via
//! [`AppshotError::remediation_hint`].

/// Result type alias for appshot operations
pub type AppshotResult<T> = Result<T, AppshotError>;

/// Message used when the last capture strategy fails
pub const CAPTURE_FAILED_MESSAGE: &str = "Failed to capture screenshot";

/// Failure of one external program invocation
///
/// `NotFound` is kept apart from the other launch failures so callers can
/// treat a missing optional tool (e.g. `wezterm`) as "unsupported" instead of
/// an error.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The program could not be located
    #[error("Command not found: {program}")]
    NotFound {
        /// Program that was requested
        program: String,
    },

    /// The program exists but could not be started
    #[error("Failed to launch {program}: {source}")]
    Launch {
        /// Program that was requested
        program: String,
        /// Underlying spawn error
        source:  std::io::Error,
    },

    /// The program ran and exited unsuccessfully
    #[error("Command failed: {program} ({}){}", describe_exit(*code), describe_stderr(stderr))]
    Exited {
        /// Program that was run
        program: String,
        /// Exit code, `None` when terminated by a signal
        code:    Option<i32>,
        /// Everything the program wrote to stdout
        stdout:  String,
        /// Everything the program wrote to stderr
        stderr:  String,
    },
}

impl ProcessError {
    /// True when the program itself could not be found
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProcessError::NotFound { .. })
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed.lines().next().unwrap_or_default())
    }
}

/// Error surfaced by the public capture, render and clipboard operations
#[derive(Debug, thiserror::Error)]
pub enum AppshotError {
    /// An external program failed outside the capture fallback chain
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Every capture strategy was exhausted
    #[error("{reason}")]
    Capture {
        /// Human-readable failure description
        reason: String,
        /// Process failure of the final strategy, if it got that far
        source: Option<ProcessError>,
    },

    /// Missing or malformed input
    #[error("Invalid argument '{parameter}': {reason}")]
    Validation {
        /// Name of the offending argument
        parameter: String,
        /// Why it was rejected
        reason:    String,
    },

    /// Operation requires macOS
    #[error("This tool currently supports only macOS (running on {os})")]
    Platform {
        /// Detected operating system
        os: String,
    },

    /// File or stream I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppshotError {
    /// Builds a validation error for `parameter`
    pub fn validation(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        AppshotError::Validation {
            parameter: parameter.into(),
            reason:    reason.into(),
        }
    }

    /// Builds the terminal capture failure, optionally keeping the process
    /// error that caused it
    pub fn capture_failed(source: Option<ProcessError>) -> Self {
        AppshotError::Capture {
            reason: CAPTURE_FAILED_MESSAGE.to_string(),
            source,
        }
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use appshot_core::error::AppshotError;
    ///
    /// let error = AppshotError::Platform {
    ///     os: "linux".to_string(),
    /// };
    /// assert!(error.remediation_hint().contains("macOS"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            AppshotError::Process(ProcessError::NotFound { .. }) => {
                "A required system tool is missing. osascript and /usr/sbin/screencapture ship \
                 with macOS; check that PATH has not been overridden."
            }
            AppshotError::Process(_) => {
                "An external command failed. Grant Accessibility and Screen Recording \
                 permission to your terminal in System Settings > Privacy & Security."
            }
            AppshotError::Capture { .. } => {
                "Screen capture produced no image. Grant Screen Recording permission to your \
                 terminal in System Settings > Privacy & Security > Screen Recording, then \
                 restart the terminal."
            }
            AppshotError::Validation { parameter, .. } => match parameter.as_str() {
                "app" => "Pass the exact, case-sensitive name of a running application.",
                "display" => "Use one of: auto, inline, path, base64.",
                _ => "Run with --help to see the accepted arguments.",
            },
            AppshotError::Platform { .. } => {
                "Window capture relies on macOS System Events and screencapture. Run on macOS."
            }
            AppshotError::Io(_) => {
                "An I/O error occurred. Check that the output directory is writable and has \
                 free space."
            }
        }
    }
}
