//! End-to-end tests for the `appshot` command line

mod common;

use std::path::Path;

use appshot_core::{
    capture::constants::OSASCRIPT_BIN,
    clipboard::CLIPBOARD_MARKER,
    process::{
        MockRunner,
        mock::{MOCK_PNG, MockCapture, ScreencaptureScope},
    },
};
use appshot_cli::USAGE;

use crate::common::CliHarness;

fn clipboard_calls(harness: &CliHarness) -> usize {
    harness
        .runner
        .count_matching(|call| call.program == OSASCRIPT_BIN && call.mentions(CLIPBOARD_MARKER))
}

#[tokio::test]
async fn test_path_display_prints_saved_line() {
    let harness = CliHarness::new(MockRunner::macos_happy_path());
    let out_dir = harness.out_dir_arg();

    let result = harness.run(&["--app", "Notes", "--display", "path", "--out-dir", out_dir.as_str()]).await;

    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
    let line = result.stdout.lines().next().unwrap();
    let path = line.strip_prefix("Screenshot saved to: ").unwrap();
    let out_dir = harness.out_dir.path().canonicalize().unwrap();
    assert_eq!(Path::new(path).parent(), Some(out_dir.as_path()));
    assert_eq!(std::fs::read(path).unwrap(), MOCK_PNG);
    assert!(result.stderr.is_empty());
}

#[tokio::test]
async fn test_missing_app_prints_usage() {
    let harness = CliHarness::new(MockRunner::macos_happy_path());

    let result = harness.run(&[]).await;

    assert_eq!(result.code, 1);
    assert_eq!(result.stdout.trim_end(), USAGE);
    assert!(harness.runner.calls().is_empty());
}

#[tokio::test]
async fn test_empty_app_prints_usage() {
    let harness = CliHarness::new(MockRunner::macos_happy_path());
    let result = harness.run(&["--app", ""]).await;
    assert_eq!(result.code, 1);
    assert!(result.stdout.starts_with("Usage: appshot"));
}

#[tokio::test]
async fn test_help_exit_codes() {
    let harness = CliHarness::new(MockRunner::macos_happy_path());

    let alone = harness.run(&["--help"]).await;
    assert_eq!(alone.code, 1);
    assert!(alone.stdout.starts_with("Usage: appshot"));

    let with_app = harness.run(&["-h", "--app", "Notes"]).await;
    assert_eq!(with_app.code, 0);
    assert!(with_app.stdout.starts_with("Usage: appshot"));

    assert!(harness.runner.calls().is_empty(), "help never captures");
}

#[tokio::test]
async fn test_unknown_flag_fails() {
    let harness = CliHarness::new(MockRunner::macos_happy_path());

    let result = harness.run(&["--app", "Notes", "--bogus"]).await;

    assert_eq!(result.code, 1);
    assert!(result.stderr.contains("--bogus"));
    assert_eq!(result.stderr.lines().count(), 1);
    assert!(harness.runner.calls().is_empty());
}

#[tokio::test]
async fn test_bad_display_fails_before_capture() {
    let harness = CliHarness::new(MockRunner::macos_happy_path());

    let result = harness.run(&["--app", "Notes", "--display", "sixel"]).await;

    assert_eq!(result.code, 1);
    assert!(result.stderr.contains("display"));
    assert!(harness.runner.calls().is_empty());
}

#[tokio::test]
async fn test_copy_runs_after_capture() {
    let harness = CliHarness::new(MockRunner::macos_happy_path());
    let out_dir = harness.out_dir_arg();

    let result = harness
        .run(&["--app", "Notes", "--display", "path", "--copy", "--out-dir", out_dir.as_str()])
        .await;

    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
    let lines: Vec<&str> = result.stdout.lines().collect();
    assert_eq!(lines.last(), Some(&"Copied PNG to clipboard"));
    assert_eq!(clipboard_calls(&harness), 1);
    let calls = harness.runner.calls();
    assert!(calls.last().unwrap().mentions(CLIPBOARD_MARKER));
}

#[tokio::test]
async fn test_relative_out_dir_yields_absolute_path() {
    let harness = CliHarness::new(MockRunner::macos_happy_path());
    let relative = format!("appshot-cli-rel-{}", std::process::id());

    let result = harness
        .run(&["--app", "Notes", "--display", "path", "--copy", "--out-dir", relative.as_str()])
        .await;

    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
    let line = result.stdout.lines().next().unwrap();
    let path = Path::new(line.strip_prefix("Screenshot saved to: ").unwrap());
    assert!(path.is_absolute(), "{} is relative", path.display());
    assert_eq!(std::fs::read(path).unwrap(), MOCK_PNG);

    let clipboard = harness.runner.calls().into_iter().find(|c| c.mentions(CLIPBOARD_MARKER)).unwrap();
    assert_eq!(clipboard.args.last().map(String::as_str), path.to_str());

    std::fs::remove_dir_all(&relative).unwrap();
}

#[tokio::test]
async fn test_no_copy_without_flag() {
    let harness = CliHarness::new(MockRunner::macos_happy_path());
    let out_dir = harness.out_dir_arg();

    let result = harness.run(&["--app", "Notes", "--display", "path", "--out-dir", out_dir.as_str()]).await;

    assert_eq!(result.code, 0);
    assert_eq!(clipboard_calls(&harness), 0);
}

#[tokio::test]
async fn test_capture_failure_skips_clipboard() {
    let harness = CliHarness::new(
        MockRunner::new()
            .failing_window_queries()
            .with_screencapture(ScreencaptureScope::FullScreen, MockCapture::Fails)
            .with_clipboard(),
    );
    let out_dir = harness.out_dir_arg();

    let result = harness.run(&["--app", "Notes", "--copy", "--out-dir", out_dir.as_str()]).await;

    assert_eq!(result.code, 1);
    assert_eq!(result.stderr.trim_end(), "Failed to capture screenshot");
    assert!(result.stdout.is_empty());
    assert_eq!(clipboard_calls(&harness), 0);
}

#[tokio::test]
async fn test_clipboard_failure_exits_nonzero() {
    let harness = CliHarness::new(
        MockRunner::new()
            .with_window_id("1")
            .with_screencapture(ScreencaptureScope::Window, MockCapture::WritesPng)
            .failing_clipboard(),
    );
    let out_dir = harness.out_dir_arg();

    let result = harness
        .run(&["--app", "Notes", "--display", "path", "--copy", "--out-dir", out_dir.as_str()])
        .await;

    assert_eq!(result.code, 1);
    assert!(result.stdout.starts_with("Screenshot saved to: "));
    assert!(!result.stdout.contains("Copied"));
    assert_eq!(result.stderr.lines().count(), 1);
}

#[tokio::test]
async fn test_base64_display_prints_encoding() {
    let harness = CliHarness::new(MockRunner::macos_happy_path());
    let out_dir = harness.out_dir_arg();

    let result = harness
        .run(&["--app", "Notes", "--display", "base64", "--out-dir", out_dir.as_str()])
        .await;

    assert_eq!(result.code, 0);
    assert!(result.stdout.trim_end().starts_with("iVBORw0KGgo"));
}

#[tokio::test]
async fn test_unsupported_platform_reports_error() {
    let harness = CliHarness::on_platform(MockRunner::macos_happy_path(), "linux");

    let result = harness.run(&["--app", "Notes"]).await;

    assert_eq!(result.code, 1);
    assert!(result.stderr.contains("only macOS"));
    assert!(harness.runner.calls().is_empty());
}
