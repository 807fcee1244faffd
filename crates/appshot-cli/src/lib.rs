//! appshot-cli: capture an application window and show it in the terminal
//!
//! The binary is a thin wrapper around [`run`], which takes the argument list,
//! a backend and both output streams so it can be driven end-to-end from
//! tests.

use std::{ffi::OsString, io::Write, path::PathBuf};

use appshot_core::{
    capture::ShotBackend,
    error::AppshotResult,
    model::{CaptureRequest, DisplayMode},
};
use clap::Parser;
use tracing::{debug, info};

/// One-line usage text, printed for `--help` and when `--app` is missing
pub const USAGE: &str = "Usage: appshot --app <AppName> [--display inline|path|base64|auto] [--copy] \
                         [--out-dir <dir>]";

/// Command-line arguments
///
/// clap's generated help is disabled so that `--help` follows the exit code
/// rules of [`run`].
#[derive(Debug, Parser)]
#[command(name = "appshot", disable_help_flag = true, disable_version_flag = true)]
pub struct CliArgs {
    /// Exact, case-sensitive application name
    #[arg(long)]
    pub app: Option<String>,

    /// inline, path, base64 or auto (default)
    #[arg(long)]
    pub display: Option<String>,

    /// Copy the PNG to the clipboard after rendering
    #[arg(long)]
    pub copy: bool,

    /// Directory for the capture instead of a fresh temp directory
    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Print usage
    #[arg(short = 'h', long = "help")]
    pub help: bool,
}

impl CliArgs {
    /// Application name, if given and non-blank
    fn app_name(&self) -> Option<&str> {
        self.app.as_deref().filter(|app| !app.trim().is_empty())
    }

    /// Requested display mode, `auto` when omitted
    pub fn display_mode(&self) -> AppshotResult<DisplayMode> {
        match &self.display {
            Some(value) => value.parse(),
            None => Ok(DisplayMode::default()),
        }
    }
}

/// Runs the CLI and returns the process exit code
///
/// - usage on `out`, exit 1: `--app` missing or empty (with or without `--help`)
/// - usage on `out`, exit 0: `--help` with an app name
/// - one line on `err`, exit 1: parse error, bad `--display`, capture,
///   render or clipboard failure
/// - exit 0 otherwise
pub async fn run<I, T, O, E>(args: I, backend: &ShotBackend, out: &mut O, err: &mut E) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    O: Write + Send + ?Sized,
    E: Write + ?Sized,
{
    let cli = match CliArgs::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let message = error.to_string();
            let line = message.lines().next().unwrap_or("invalid arguments");
            let _ = writeln!(err, "{}", line.trim_start_matches("error: "));
            return 1;
        }
    };

    let Some(app) = cli.app_name() else {
        let _ = writeln!(out, "{USAGE}");
        return 1;
    };
    if cli.help {
        let _ = writeln!(out, "{USAGE}");
        return 0;
    }

    match capture_and_show(&cli, app, backend, out).await {
        Ok(()) => 0,
        Err(error) => {
            debug!(hint = error.remediation_hint(), "appshot failed");
            let _ = writeln!(err, "{error}");
            1
        }
    }
}

async fn capture_and_show<O>(
    cli: &CliArgs,
    app: &str,
    backend: &ShotBackend,
    out: &mut O,
) -> AppshotResult<()>
where
    O: Write + Send + ?Sized,
{
    let display = cli.display_mode()?;
    let request = CaptureRequest::builder(app)
        .maybe_output_directory(cli.out_dir.clone())
        .build()?;

    let path = backend.capturer.capture_application_window(&request).await?;
    let outcome = backend.renderer.display_image(&path, display, out).await?;
    info!(
        path = %path.display(),
        display = %outcome.display,
        inline = outcome.inline,
        "screenshot ready"
    );

    if cli.copy {
        backend.clipboard.copy_png(&path).await?;
        writeln!(out, "Copied PNG to clipboard")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use appshot_core::error::AppshotError;

    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("appshot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = parse(&["--app", "Notes", "--display", "path", "--copy", "--out-dir", "/tmp/o"]);
        assert_eq!(cli.app.as_deref(), Some("Notes"));
        assert_eq!(cli.display_mode().unwrap(), DisplayMode::Path);
        assert!(cli.copy);
        assert_eq!(cli.out_dir, Some(PathBuf::from("/tmp/o")));
        assert!(!cli.help);
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--app", "Notes"]);
        assert_eq!(cli.display_mode().unwrap(), DisplayMode::Auto);
        assert!(!cli.copy);
        assert!(cli.out_dir.is_none());
    }

    #[test]
    fn test_short_help_is_plain_flag() {
        assert!(parse(&["-h"]).help);
        assert!(parse(&["--help", "--app", "X"]).help);
    }

    #[test]
    fn test_blank_app_is_missing() {
        assert!(parse(&["--app", "  "]).app_name().is_none());
        assert!(parse(&[]).app_name().is_none());
    }

    #[test]
    fn test_bad_display_is_validation_error() {
        let err = parse(&["--app", "Notes", "--display", "sixel"]).display_mode().unwrap_err();
        assert!(matches!(err, AppshotError::Validation { ref parameter, .. } if parameter == "display"));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(CliArgs::try_parse_from(["appshot", "--app", "Notes", "--bogus"]).is_err());
    }
}
