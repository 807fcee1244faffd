//! Scriptable process runner for testing
//!
//! [`MockRunner`] implements [`ProcessRunner`] without touching the operating
//! system. Each call is matched against an ordered list of rules; the first
//! matching rule produces the result. Calls that match no rule fail with
//! [`ProcessError::NotFound`], which is exactly how a missing optional tool
//! behaves on a real system.
//!
//! Presets cover the programs this crate drives:
//!
//! ```
//! use std::sync::Arc;
//!
//! use appshot_core::process::mock::{MockCapture, MockRunner, ScreencaptureScope};
//!
//! // Window id lookup fails, frame lookup works, region capture writes a PNG
//! let runner = Arc::new(
//!     MockRunner::new()
//!         .with_window_id("")
//!         .with_window_frame("0,0,800,600")
//!         .with_screencapture(ScreencaptureScope::Region, MockCapture::WritesPng),
//! );
//! assert_eq!(runner.calls().len(), 0);
//! ```

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use tokio::time::sleep;

use super::{ProcessOutput, ProcessRunner};
use crate::{
    capture::{
        constants::{FLAG_REGION, FLAG_WINDOW_ID, OSASCRIPT_BIN, SCREENCAPTURE_BIN, WEZTERM_BIN},
        window_query::{WINDOW_FRAME_MARKER, WINDOW_ID_MARKER},
    },
    clipboard::CLIPBOARD_MARKER,
    error::ProcessError,
};

/// Smallest valid PNG (1x1, transparent), written by mocked captures
pub const MOCK_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// One invocation seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Program name as passed to `run`
    pub program: String,
    /// Arguments as passed to `run`
    pub args:    Vec<String>,
    /// Bytes supplied on stdin
    pub input:   Option<Vec<u8>>,
}

impl RecordedCall {
    /// True if any argument contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.args.iter().any(|arg| arg.contains(needle))
    }

    /// Which `screencapture` mode this call used, if it was one
    pub fn screencapture_scope(&self) -> Option<ScreencaptureScope> {
        if self.program != SCREENCAPTURE_BIN {
            return None;
        }
        if self.args.iter().any(|a| a == FLAG_WINDOW_ID) {
            Some(ScreencaptureScope::Window)
        } else if self.args.iter().any(|a| a == FLAG_REGION) {
            Some(ScreencaptureScope::Region)
        } else {
            Some(ScreencaptureScope::FullScreen)
        }
    }
}

/// `screencapture` invocation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreencaptureScope {
    /// `-l <id>`
    Window,
    /// `-R <x,y,w,h>`
    Region,
    /// no scoping flag
    FullScreen,
}

/// What a mocked `screencapture` does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCapture {
    /// Exit 0 after writing [`MOCK_PNG`] to the destination
    WritesPng,
    /// Exit 0 after writing a zero-byte file
    WritesEmpty,
    /// Exit 0 without creating a file
    WritesNothing,
    /// Exit 1 without creating a file
    Fails,
}

type Matcher = Box<dyn Fn(&RecordedCall) -> bool + Send + Sync>;
type Responder = Box<dyn Fn(&RecordedCall) -> Result<ProcessOutput, ProcessError> + Send + Sync>;

struct Rule {
    matcher:   Matcher,
    responder: Responder,
}

/// Mock [`ProcessRunner`] with call recording
///
/// Share it through an `Arc` and keep a clone to inspect [`Self::calls`]
/// after the code under test has run.
#[derive(Default)]
pub struct MockRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
}

impl std::fmt::Debug for MockRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRunner")
            .field("rules", &self.rules.len())
            .field("calls", &self.recorded().len())
            .field("delay", &self.delay)
            .finish()
    }
}

impl MockRunner {
    /// Creates a runner with no rules: every call reports `NotFound`
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that behaves like a healthy macOS session: the window id
    /// lookup answers `4242`, every capture writes a PNG and the clipboard
    /// script succeeds
    pub fn macos_happy_path() -> Self {
        Self::new()
            .with_window_id("4242\n")
            .with_screencapture(ScreencaptureScope::Window, MockCapture::WritesPng)
            .with_screencapture(ScreencaptureScope::Region, MockCapture::WritesPng)
            .with_screencapture(ScreencaptureScope::FullScreen, MockCapture::WritesPng)
            .with_clipboard()
    }

    /// Adds a rule; earlier rules win
    pub fn on<M, R>(mut self, matcher: M, responder: R) -> Self
    where
        M: Fn(&RecordedCall) -> bool + Send + Sync + 'static,
        R: Fn(&RecordedCall) -> Result<ProcessOutput, ProcessError> + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            matcher:   Box::new(matcher),
            responder: Box::new(responder),
        });
        self
    }

    /// Delays every call by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Window id query prints `stdout`
    pub fn with_window_id(self, stdout: &str) -> Self {
        let stdout = stdout.to_string();
        self.on(
            |call| call.program == OSASCRIPT_BIN && call.mentions(WINDOW_ID_MARKER),
            move |_| Ok(ProcessOutput::stdout(stdout.clone())),
        )
    }

    /// Window frame query prints `stdout`
    pub fn with_window_frame(self, stdout: &str) -> Self {
        let stdout = stdout.to_string();
        self.on(
            |call| call.program == OSASCRIPT_BIN && call.mentions(WINDOW_FRAME_MARKER),
            move |_| Ok(ProcessOutput::stdout(stdout.clone())),
        )
    }

    /// Both window queries exit 1, as when Accessibility access is denied
    pub fn failing_window_queries(self) -> Self {
        self.on(
            |call| {
                call.program == OSASCRIPT_BIN
                    && (call.mentions(WINDOW_ID_MARKER) || call.mentions(WINDOW_FRAME_MARKER))
            },
            |call| Err(exited(call, 1, "execution error: System Events got an error (-1743)")),
        )
    }

    /// `screencapture` in `scope` behaves per `outcome`
    pub fn with_screencapture(self, scope: ScreencaptureScope, outcome: MockCapture) -> Self {
        self.on(
            move |call| call.screencapture_scope() == Some(scope),
            move |call| respond_capture(call, outcome),
        )
    }

    /// Clipboard script succeeds
    pub fn with_clipboard(self) -> Self {
        self.on(
            |call| call.program == OSASCRIPT_BIN && call.mentions(CLIPBOARD_MARKER),
            |_| Ok(ProcessOutput::stdout("ok\n")),
        )
    }

    /// Clipboard script exits 1
    pub fn failing_clipboard(self) -> Self {
        self.on(
            |call| call.program == OSASCRIPT_BIN && call.mentions(CLIPBOARD_MARKER),
            |call| Err(exited(call, 1, "execution error: Can't make file into type PNGf")),
        )
    }

    /// `wezterm imgcat` succeeds printing `stdout`
    pub fn with_wezterm(self, stdout: &str) -> Self {
        let stdout = stdout.to_string();
        self.on(
            |call| call.program == WEZTERM_BIN,
            move |_| Ok(ProcessOutput::stdout(stdout.clone())),
        )
    }

    /// `wezterm imgcat` exits 1
    pub fn failing_wezterm(self) -> Self {
        self.on(|call| call.program == WEZTERM_BIN, |call| Err(exited(call, 1, "no pane")))
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.recorded().clone()
    }

    /// Number of calls to `program`
    pub fn count(&self, program: &str) -> usize {
        self.recorded().iter().filter(|c| c.program == program).count()
    }

    /// Number of `screencapture` calls in `scope`
    pub fn screencapture_count(&self, scope: ScreencaptureScope) -> usize {
        self.recorded()
            .iter()
            .filter(|c| c.screencapture_scope() == Some(scope))
            .count()
    }

    /// Number of calls satisfying `predicate`
    pub fn count_matching(&self, predicate: impl Fn(&RecordedCall) -> bool) -> usize {
        self.recorded().iter().filter(|c| predicate(c)).count()
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ProcessRunner for MockRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        input: Option<&[u8]>,
    ) -> Result<ProcessOutput, ProcessError> {
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        let call = RecordedCall {
            program: program.to_string(),
            args:    args.to_vec(),
            input:   input.map(<[u8]>::to_vec),
        };
        self.recorded().push(call.clone());

        match self.rules.iter().find(|rule| (rule.matcher)(&call)) {
            Some(rule) => (rule.responder)(&call),
            None => Err(ProcessError::NotFound {
                program: program.to_string(),
            }),
        }
    }
}

fn exited(call: &RecordedCall, code: i32, stderr: &str) -> ProcessError {
    ProcessError::Exited {
        program: call.program.clone(),
        code:    Some(code),
        stdout:  String::new(),
        stderr:  stderr.to_string(),
    }
}

fn respond_capture(call: &RecordedCall, outcome: MockCapture) -> Result<ProcessOutput, ProcessError> {
    let dest = call.args.last().map(Path::new);
    let written = match (outcome, dest) {
        (MockCapture::WritesPng, Some(dest)) => std::fs::write(dest, MOCK_PNG),
        (MockCapture::WritesEmpty, Some(dest)) => std::fs::write(dest, b""),
        (MockCapture::Fails, _) => {
            return Err(exited(call, 1, "could not create image from window"));
        }
        _ => Ok(()),
    };
    written.map_err(|source| ProcessError::Launch {
        program: call.program.clone(),
        source,
    })?;
    Ok(ProcessOutput::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_unmatched_call_is_not_found() {
        let runner = MockRunner::new();
        let err = runner.run("wezterm", &args(&["imgcat", "x.png"]), None).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(runner.count("wezterm"), 1);
    }

    #[tokio::test]
    async fn test_first_matching_rule_wins() {
        let runner = MockRunner::new()
            .on(|c| c.program == "echo", |_| Ok(ProcessOutput::stdout("first")))
            .on(|c| c.program == "echo", |_| Ok(ProcessOutput::stdout("second")));
        let out = runner.run("echo", &[], None).await.unwrap();
        assert_eq!(out.stdout, "first");
    }

    #[tokio::test]
    async fn test_screencapture_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("shot.png");
        let runner =
            MockRunner::new().with_screencapture(ScreencaptureScope::FullScreen, MockCapture::WritesPng);

        runner
            .run(SCREENCAPTURE_BIN, &args(&["-x", "-o", dest.to_str().unwrap()]), None)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), MOCK_PNG);
        assert_eq!(runner.screencapture_count(ScreencaptureScope::FullScreen), 1);
        assert_eq!(runner.screencapture_count(ScreencaptureScope::Window), 0);
    }

    #[tokio::test]
    async fn test_screencapture_scope_detection() {
        let runner = MockRunner::new();
        let _ = runner.run(SCREENCAPTURE_BIN, &args(&["-x", "-o", "-l", "1", "a.png"]), None).await;
        let _ = runner
            .run(SCREENCAPTURE_BIN, &args(&["-x", "-o", "-R", "0,0,1,1", "a.png"]), None)
            .await;
        let calls = runner.calls();
        assert_eq!(calls[0].screencapture_scope(), Some(ScreencaptureScope::Window));
        assert_eq!(calls[1].screencapture_scope(), Some(ScreencaptureScope::Region));
    }

    #[tokio::test]
    async fn test_records_input() {
        let runner = MockRunner::new().on(|_| true, |_| Ok(ProcessOutput::default()));
        runner.run("cat", &[], Some(b"abc")).await.unwrap();
        assert_eq!(runner.calls()[0].input.as_deref(), Some(&b"abc"[..]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_applied() {
        let runner = MockRunner::new().with_delay(Duration::from_secs(5));
        let start = tokio::time::Instant::now();
        let _ = runner.run("anything", &[], None).await;
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
