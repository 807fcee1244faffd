//! Platform and terminal detection
//!
//! Both detectors are pure functions of their inputs. Terminal detection only
//! looks at environment variables; it never queries the terminal with escape
//! sequences, so an unrecognised terminal simply gets no inline images.

use std::env;

use crate::model::{PlatformInfo, TerminalKind};

/// Detects the current operating system
///
/// # Examples
///
/// ```
/// use appshot_core::util::detect::detect_platform;
///
/// let platform = detect_platform();
/// assert!(!platform.os.is_empty());
/// ```
pub fn detect_platform() -> PlatformInfo {
    #[cfg(target_os = "macos")]
    {
        PlatformInfo::new("macos")
    }

    #[cfg(not(target_os = "macos"))]
    {
        PlatformInfo::new(env::consts::OS)
    }
}

/// Classifies the current terminal from the process environment
///
/// Read fresh on every call; nothing is cached.
pub fn detect_terminal() -> TerminalKind {
    detect_terminal_with_env(|key| env::var(key).ok())
}

/// Terminal detection with a custom environment variable provider
///
/// Rules are checked in order and the first match wins:
///
/// 1. `TERM_PROGRAM` is `iTerm.app` → [`TerminalKind::Iterm`]
/// 2. `KITTY_WINDOW_ID` is set, or `TERM` contains `kitty` → [`TerminalKind::Kitty`]
/// 3. `WEZTERM_PANE` is set, or `TERM_PROGRAM` is `WezTerm` → [`TerminalKind::Wezterm`]
/// 4. otherwise [`TerminalKind::None`]
///
/// Empty values count as unset.
///
/// # Examples
///
/// ```
/// use appshot_core::{model::TerminalKind, util::detect::detect_terminal_with_env};
///
/// let kind = detect_terminal_with_env(|key| {
///     (key == "TERM").then(|| "xterm-kitty".to_string())
/// });
/// assert_eq!(kind, TerminalKind::Kitty);
/// ```
pub fn detect_terminal_with_env<F>(env_provider: F) -> TerminalKind
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| env_provider(key).filter(|value| !value.is_empty());
    let term_program = var("TERM_PROGRAM");

    if term_program.as_deref() == Some("iTerm.app") {
        return TerminalKind::Iterm;
    }

    if var("KITTY_WINDOW_ID").is_some() || var("TERM").is_some_and(|term| term.contains("kitty")) {
        return TerminalKind::Kitty;
    }

    if var("WEZTERM_PANE").is_some() || term_program.as_deref() == Some("WezTerm") {
        return TerminalKind::Wezterm;
    }

    TerminalKind::None
}
