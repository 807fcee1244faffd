//! Front-window lookups through System Events
//!
//! Both lookups run a small AppleScript with the application name passed as
//! `item 1 of argv`, so names never need quoting. Matching is exact and
//! case-sensitive; a missing process or a process with no windows yields an
//! empty answer rather than an error.

use std::sync::Arc;

use tracing::debug;

use super::constants::OSASCRIPT_BIN;
use crate::{
    error::AppshotResult,
    model::WindowFrame,
    process::ProcessRunner,
};

/// Marker unique to [`WINDOW_ID_SCRIPT`]
pub const WINDOW_ID_MARKER: &str = "AXWindowID";

/// Marker unique to [`WINDOW_FRAME_SCRIPT`]
pub const WINDOW_FRAME_MARKER: &str = "position of theWin";

/// Returns the `AXWindowID` of the application's first window, or `""`.
pub const WINDOW_ID_SCRIPT: &str = r#"
on run argv
  set appName to item 1 of argv
  tell application "System Events"
    if not (exists process appName) then return ""
    tell process appName
      if (count of windows) is 0 then return ""
      set theWin to window 1
      try
        return (value of attribute "AXWindowID" of theWin) as string
      on error
        return ""
      end try
    end tell
  end tell
end run"#;

/// Returns `x,y,w,h` of the application's first window, or `""`.
pub const WINDOW_FRAME_SCRIPT: &str = r#"
on run argv
  set appName to item 1 of argv
  tell application "System Events"
    if not (exists process appName) then return ""
    tell process appName
      if (count of windows) is 0 then return ""
      set theWin to window 1
      set pos to position of theWin
      set sz to size of theWin
      set x to item 1 of pos
      set y to item 2 of pos
      set w to item 1 of sz
      set h to item 2 of sz
      return (x & "," & y & "," & w & "," & h) as string
    end tell
  end tell
end run"#;

/// Builds the `osascript` argument list for `script` with a single argv item
pub fn osascript_args(script: &str, argument: &str) -> Vec<String> {
    vec![
        "-l".to_string(),
        "AppleScript".to_string(),
        "-e".to_string(),
        script.to_string(),
        argument.to_string(),
    ]
}

/// Window-system query for one application's front window
#[derive(Clone)]
pub struct WindowQuery {
    runner: Arc<dyn ProcessRunner>,
}

impl WindowQuery {
    /// Creates a query that runs scripts through `runner`
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Id of the front window, `None` if the app or window is absent
    pub async fn front_window_id(&self, app: &str) -> AppshotResult<Option<String>> {
        let output = self
            .runner
            .run(OSASCRIPT_BIN, &osascript_args(WINDOW_ID_SCRIPT, app), None)
            .await?;
        let id = output.stdout.trim();
        debug!(app, id, "front window id query");
        Ok((!id.is_empty()).then(|| id.to_string()))
    }

    /// Frame of the front window, `None` if absent or unparsable
    pub async fn front_window_frame(&self, app: &str) -> AppshotResult<Option<WindowFrame>> {
        let output = self
            .runner
            .run(OSASCRIPT_BIN, &osascript_args(WINDOW_FRAME_SCRIPT, app), None)
            .await?;
        let frame = parse_frame(&output.stdout);
        debug!(app, raw = output.stdout.trim(), ?frame, "front window frame query");
        Ok(frame)
    }
}

/// Parses `x,y,w,h` into a [`WindowFrame`]
///
/// Exactly four comma-separated integers are required; whitespace around
/// each value is ignored.
///
/// # Examples
///
/// ```
/// use appshot_core::capture::window_query::parse_frame;
///
/// let frame = parse_frame(" 0, 25, 1440, 875\n").unwrap();
/// assert_eq!((frame.x, frame.width), (0, 1440));
/// assert!(parse_frame("").is_none());
/// assert!(parse_frame("1,2,three,4").is_none());
/// ```
pub fn parse_frame(raw: &str) -> Option<WindowFrame> {
    let values = raw
        .trim()
        .split(',')
        .map(|part| part.trim().parse::<i32>().ok())
        .collect::<Option<Vec<_>>>()?;

    match values.as_slice() {
        [x, y, width, height] => Some(WindowFrame {
            x:      *x,
            y:      *y,
            width:  *width,
            height: *height,
        }),
        _ => None,
    }
}
