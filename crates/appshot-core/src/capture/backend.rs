//! Backend facade shared by the entry points
//!
//! [`ShotBackend`] groups the three collaborators an entry point needs
//! (capturer, renderer, clipboard) around one [`ProcessRunner`], so tests can
//! swap the whole operating system for a [`MockRunner`](crate::process::MockRunner)
//! in one place.
//!
//! # Example
//!
//! ```rust,ignore
//! use appshot_core::capture::create_default_backend;
//!
//! let backend = create_default_backend();
//! let path = backend.capturer.capture_app("Notes").await?;
//! backend.renderer.display_image(&path, DisplayMode::Auto, &mut std::io::stdout())?;
//! ```

use std::sync::Arc;

use super::WindowCapturer;
use crate::{
    clipboard::Clipboard,
    model::PlatformInfo,
    process::{ProcessRunner, SystemRunner},
    render::ImageRenderer,
    util::detect::detect_platform,
};

/// Capture, render and clipboard services sharing one process runner
#[derive(Clone)]
pub struct ShotBackend {
    /// Window capture with the id, frame, full-screen fallback chain
    pub capturer:  WindowCapturer,
    /// Terminal-aware image output
    pub renderer:  ImageRenderer,
    /// macOS clipboard writer
    pub clipboard: Clipboard,
    /// Platform the services were built for
    pub platform:  PlatformInfo,
    /// Backend name for diagnostics
    pub name:      &'static str,
}

impl ShotBackend {
    /// Builds every service on top of `runner`
    pub fn new(runner: Arc<dyn ProcessRunner>, platform: PlatformInfo) -> Self {
        Self {
            capturer: WindowCapturer::new(Arc::clone(&runner), platform.clone()),
            renderer: ImageRenderer::new(Arc::clone(&runner)),
            clipboard: Clipboard::new(runner, platform.clone()),
            name: if platform.is_supported() { "macos" } else { "unsupported" },
            platform,
        }
    }

    /// Whether captures can succeed on this platform
    pub fn is_supported(&self) -> bool {
        self.platform.is_supported()
    }
}

impl std::fmt::Debug for ShotBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShotBackend")
            .field("name", &self.name)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

/// Creates the backend for the current system
///
/// Never fails: off macOS the returned backend reports
/// [`AppshotError::Platform`](crate::error::AppshotError::Platform) from each
/// capture or clipboard call instead.
pub fn create_default_backend() -> Arc<ShotBackend> {
    Arc::new(ShotBackend::new(Arc::new(SystemRunner), detect_platform()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockRunner;

    #[test]
    fn test_backend_name_follows_platform() {
        let runner = Arc::new(MockRunner::new());
        let mac = ShotBackend::new(runner.clone(), PlatformInfo::new("macos"));
        assert_eq!(mac.name, "macos");
        assert!(mac.is_supported());

        let linux = ShotBackend::new(runner, PlatformInfo::new("linux"));
        assert_eq!(linux.name, "unsupported");
        assert!(!linux.is_supported());
    }

    #[test]
    fn test_default_backend_matches_host() {
        let backend = create_default_backend();
        assert_eq!(backend.is_supported(), cfg!(target_os = "macos"));
    }
}
