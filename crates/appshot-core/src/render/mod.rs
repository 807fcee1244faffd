//! Terminal-aware image output
//!
//! [`ImageRenderer::display_image`] writes a captured PNG to an output sink
//! according to a [`DisplayMode`]:
//!
//! | Mode | Inline available | Inline unavailable or failed |
//! |------|------------------|------------------------------|
//! | `path` | path line | path line |
//! | `base64` | full base64 line | full base64 line |
//! | `inline` | escape sequence / `wezterm imgcat` | path line |
//! | `auto` | escape sequence / `wezterm imgcat` | path line + base64 preview |
//!
//! Unsupported inline rendering never fails the call. Only reading the image
//! file or writing to the sink can.

use std::{io::Write, path::Path, sync::Arc};

use tracing::{debug, warn};

use crate::{
    capture::constants::{BASE64_PREVIEW_LEN, WEZTERM_BIN},
    error::AppshotResult,
    model::{DisplayMode, RenderOutcome, TerminalKind},
    process::ProcessRunner,
    util::{
        detect::detect_terminal,
        encode::{file_to_base64, preview},
    },
};

pub mod inline;

use inline::{ensure_trailing_newline, iterm_sequence, kitty_sequence};

/// Writes `Screenshot saved to: <path>`
pub fn write_path_line<W: Write + ?Sized>(out: &mut W, path: &Path) -> AppshotResult<()> {
    writeln!(out, "Screenshot saved to: {}", path.display())?;
    Ok(())
}

/// Renders images to a terminal
#[derive(Clone)]
pub struct ImageRenderer {
    runner: Arc<dyn ProcessRunner>,
}

impl ImageRenderer {
    /// Creates a renderer that shells out through `runner` (for `wezterm`)
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Renders `path` for the terminal detected from the environment
    pub async fn display_image<W>(
        &self,
        path: &Path,
        mode: DisplayMode,
        out: &mut W,
    ) -> AppshotResult<RenderOutcome>
    where
        W: Write + Send + ?Sized,
    {
        self.display_image_on(detect_terminal(), path, mode, out).await
    }

    /// Renders `path` assuming the terminal is `kind`
    pub async fn display_image_on<W>(
        &self,
        kind: TerminalKind,
        path: &Path,
        mode: DisplayMode,
        out: &mut W,
    ) -> AppshotResult<RenderOutcome>
    where
        W: Write + Send + ?Sized,
    {
        debug!(terminal = %kind, mode = %mode, path = %path.display(), "rendering image");

        let outcome = match mode {
            DisplayMode::Path => {
                write_path_line(out, path)?;
                RenderOutcome::path()
            }
            DisplayMode::Base64 => {
                let encoded = file_to_base64(path)?;
                writeln!(out, "{encoded}")?;
                RenderOutcome {
                    display:       DisplayMode::Base64,
                    inline:        false,
                    method:        None,
                    base64_length: Some(encoded.len()),
                    base64_prefix: None,
                }
            }
            DisplayMode::Inline => {
                if self.render_inline(kind, path, out).await? {
                    RenderOutcome::inline(DisplayMode::Inline, kind)
                } else {
                    write_path_line(out, path)?;
                    RenderOutcome::path()
                }
            }
            DisplayMode::Auto => {
                if self.render_inline(kind, path, out).await? {
                    RenderOutcome::inline(DisplayMode::Auto, kind)
                } else {
                    let encoded = file_to_base64(path)?;
                    let prefix = preview(&encoded, BASE64_PREVIEW_LEN);
                    write_path_line(out, path)?;
                    writeln!(out, "Base64 prefix: {prefix}...")?;
                    RenderOutcome {
                        display:       DisplayMode::Auto,
                        inline:        false,
                        method:        kind.supports_inline().then_some(kind),
                        base64_length: None,
                        base64_prefix: Some(prefix.to_string()),
                    }
                }
            }
        };

        out.flush()?;
        Ok(outcome)
    }

    /// Tries the inline method for `kind`; `Ok(false)` means unsupported
    async fn render_inline<W>(&self, kind: TerminalKind, path: &Path, out: &mut W) -> AppshotResult<bool>
    where
        W: Write + Send + ?Sized,
    {
        match kind {
            TerminalKind::None => {
                debug!("no inline image support detected");
                Ok(false)
            }
            TerminalKind::Iterm => {
                let encoded = file_to_base64(path)?;
                let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                out.write_all(iterm_sequence(&file_name, &encoded).as_bytes())?;
                Ok(true)
            }
            TerminalKind::Kitty => {
                let encoded = file_to_base64(path)?;
                out.write_all(kitty_sequence(&encoded).as_bytes())?;
                Ok(true)
            }
            TerminalKind::Wezterm => {
                let args = vec!["imgcat".to_string(), path.to_string_lossy().into_owned()];
                match self.runner.run(WEZTERM_BIN, &args, None).await {
                    Ok(output) => {
                        out.write_all(ensure_trailing_newline(output.stdout).as_bytes())?;
                        Ok(true)
                    }
                    Err(error) if error.is_not_found() => {
                        debug!("wezterm CLI not found, inline rendering unavailable");
                        Ok(false)
                    }
                    Err(error) => {
                        warn!(%error, "wezterm imgcat failed, falling back");
                        Ok(false)
                    }
                }
            }
        }
    }
}
