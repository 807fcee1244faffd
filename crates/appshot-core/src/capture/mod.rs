//! Application window capture
//!
//! [`WindowCapturer::capture_application_window`] walks a fixed chain of
//! strategies, from most to least precise:
//!
//! | Step | Strategy | `screencapture` scope |
//! |------|----------|-----------------------|
//! | 1 | [`CaptureStrategy::WindowId`] | `-l <AXWindowID>` |
//! | 2 | [`CaptureStrategy::WindowFrame`] | `-R <x,y,w,h>` |
//! | 3 | [`CaptureStrategy::FullScreen`] | none |
//!
//! A step succeeds when the destination file exists and is non-empty. Errors
//! inside steps 1 and 2 (a failed window query, a failed scoped capture) only
//! mean "try the next step". Step 3 is the only one allowed to fail the
//! operation, with [`AppshotError::Capture`].
//!
//! [`ShotBackend`] bundles the capturer with the renderer and clipboard that
//! share its process runner; [`create_default_backend`] wires it to the real
//! system.

use std::{path::Path, path::PathBuf, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    error::{AppshotError, AppshotResult},
    model::{CaptureRequest, PlatformInfo, WindowLocator},
    process::ProcessRunner,
    util::output_path::allocate_destination,
};

pub mod backend;
pub mod constants;
pub mod window_query;

pub use backend::{ShotBackend, create_default_backend};
pub use window_query::WindowQuery;

use constants::{
    FLAG_NO_SHADOW, FLAG_NO_SOUND, FLAG_REGION, FLAG_WINDOW_ID, SCREENCAPTURE_BIN,
};

/// One step of the capture fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStrategy {
    /// Capture exactly the front window by its window-server id
    WindowId,
    /// Capture the screen rectangle under the front window
    WindowFrame,
    /// Capture the entire screen
    FullScreen,
}

impl CaptureStrategy {
    /// The chain, in the order it is attempted
    pub const CHAIN: [CaptureStrategy; 3] = [
        CaptureStrategy::WindowId,
        CaptureStrategy::WindowFrame,
        CaptureStrategy::FullScreen,
    ];

    /// Short name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureStrategy::WindowId => "window-id",
            CaptureStrategy::WindowFrame => "window-frame",
            CaptureStrategy::FullScreen => "full-screen",
        }
    }
}

/// Builds the `screencapture` argument list for an optional locator
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use appshot_core::{capture::screencapture_args, model::WindowLocator};
///
/// let args = screencapture_args(
///     Some(&WindowLocator::WindowId("42".to_string())),
///     Path::new("/tmp/shot.png"),
/// );
/// assert_eq!(args, ["-x", "-o", "-l", "42", "/tmp/shot.png"]);
/// ```
pub fn screencapture_args(locator: Option<&WindowLocator>, dest: &Path) -> Vec<String> {
    let mut args = vec![FLAG_NO_SOUND.to_string(), FLAG_NO_SHADOW.to_string()];
    match locator {
        Some(WindowLocator::WindowId(id)) => {
            args.push(FLAG_WINDOW_ID.to_string());
            args.push(id.clone());
        }
        Some(WindowLocator::Frame(frame)) => {
            args.push(FLAG_REGION.to_string());
            args.push(frame.to_string());
        }
        None => {}
    }
    args.push(dest.to_string_lossy().into_owned());
    args
}

/// True when `path` is a regular, non-empty file
pub fn is_usable_capture(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.len() > 0)
}

/// Captures application windows through the fallback chain
#[derive(Clone)]
pub struct WindowCapturer {
    runner:   Arc<dyn ProcessRunner>,
    query:    WindowQuery,
    platform: PlatformInfo,
}

impl WindowCapturer {
    /// Creates a capturer for `platform` that runs programs through `runner`
    pub fn new(runner: Arc<dyn ProcessRunner>, platform: PlatformInfo) -> Self {
        Self {
            query: WindowQuery::new(Arc::clone(&runner)),
            runner,
            platform,
        }
    }

    /// Captures `app`'s front window into a fresh temp directory
    pub async fn capture_app(&self, app: &str) -> AppshotResult<PathBuf> {
        let request = CaptureRequest::builder(app).build()?;
        self.capture_application_window(&request).await
    }

    /// Captures the front window of `request`'s application
    ///
    /// Returns the path of a non-empty PNG. The file is never deleted by
    /// this crate.
    ///
    /// # Errors
    ///
    /// - [`AppshotError::Platform`] off macOS, before anything runs
    /// - [`AppshotError::Io`] if the output directory cannot be created
    /// - [`AppshotError::Capture`] if the full-screen fallback fails too
    pub async fn capture_application_window(
        &self,
        request: &CaptureRequest,
    ) -> AppshotResult<PathBuf> {
        self.platform.ensure_supported()?;
        let app = request.application_name();
        let dest = allocate_destination(request)?;
        debug!(app, dest = %dest.display(), "starting capture chain");

        let (last, preferred) = CaptureStrategy::CHAIN
            .split_last()
            .ok_or_else(|| AppshotError::capture_failed(None))?;

        for strategy in preferred {
            match self.attempt(*strategy, app, &dest).await {
                Ok(true) => {
                    info!(app, strategy = strategy.as_str(), path = %dest.display(), "captured");
                    return Ok(dest);
                }
                Ok(false) => {
                    debug!(app, strategy = strategy.as_str(), "strategy produced no image");
                }
                Err(error) => {
                    debug!(app, strategy = strategy.as_str(), %error, "strategy failed");
                }
            }
        }

        warn!(app, "window capture unavailable, falling back to full screen");
        match self.attempt(*last, app, &dest).await {
            Ok(true) => {
                info!(app, strategy = last.as_str(), path = %dest.display(), "captured");
                Ok(dest)
            }
            Ok(false) => Err(AppshotError::capture_failed(None)),
            Err(AppshotError::Process(source)) => Err(AppshotError::capture_failed(Some(source))),
            Err(other) => Err(other),
        }
    }

    /// Runs one strategy; `Ok(false)` means it produced no usable file
    pub async fn attempt(
        &self,
        strategy: CaptureStrategy,
        app: &str,
        dest: &Path,
    ) -> AppshotResult<bool> {
        let locator = match strategy {
            CaptureStrategy::WindowId => match self.query.front_window_id(app).await? {
                Some(id) => Some(WindowLocator::WindowId(id)),
                None => return Ok(false),
            },
            CaptureStrategy::WindowFrame => match self.query.front_window_frame(app).await? {
                Some(frame) => Some(WindowLocator::Frame(frame)),
                None => return Ok(false),
            },
            CaptureStrategy::FullScreen => None,
        };

        self.runner
            .run(SCREENCAPTURE_BIN, &screencapture_args(locator.as_ref(), dest), None)
            .await?;
        Ok(is_usable_capture(dest))
    }
}
