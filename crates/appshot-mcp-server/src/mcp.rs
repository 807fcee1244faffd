//! MCP service implementation with tool routing
//!
//! One tool, `screenshot_app`, captures a macOS application's front window
//! and returns the file path, an optional inline PNG and a metadata object.
//! The server never writes rendered output to its own stdout: that stream is
//! the protocol transport.

use std::sync::Arc;

use appshot_core::{
    capture::ShotBackend,
    error::AppshotError,
    model::{CaptureRequest, DisplayMode},
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ErrorData as McpError, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::mcp_content::build_screenshot_result;

/// Server name reported during initialization
pub const SERVER_NAME: &str = "appshot-mcp";

/// Parameters for the screenshot_app tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotAppParams {
    /// Exact, case-sensitive name of a running application (e.g. "Safari")
    pub app: String,

    /// Requested display mode: auto (default), inline, path or base64.
    /// Reported back in the metadata; the server itself never renders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayMode>,

    /// Copy the PNG to the macOS clipboard (default: false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_to_clipboard: Option<bool>,

    /// Attach the PNG as an inline image block (default: false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_image: Option<bool>,
}

/// Converts an AppshotError to an MCP ErrorData
///
/// Argument problems are the caller's to fix (`invalid_params`); everything
/// else is reported as `internal_error`. The remediation hint travels in the
/// error data.
pub fn convert_error_to_mcp(error: AppshotError) -> McpError {
    let data = Some(serde_json::json!({ "hint": error.remediation_hint() }));
    match &error {
        AppshotError::Validation { .. } => McpError::invalid_params(error.to_string(), data),
        AppshotError::Process(_)
        | AppshotError::Capture { .. }
        | AppshotError::Platform { .. }
        | AppshotError::Io(_) => McpError::internal_error(error.to_string(), data),
    }
}

/// appshot MCP server
#[derive(Clone)]
pub struct AppshotMcpServer {
    tool_router: ToolRouter<Self>,
    backend:     Arc<ShotBackend>,
}

#[tool_router]
impl AppshotMcpServer {
    /// Creates a server over `backend`
    pub fn new(backend: Arc<ShotBackend>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            backend,
        }
    }

    /// Captures an application's front window
    ///
    /// Request:
    /// ```json
    /// {
    ///   "method": "tools/call",
    ///   "params": {
    ///     "name": "screenshot_app",
    ///     "arguments": { "app": "Safari", "copyToClipboard": true }
    ///   }
    /// }
    /// ```
    ///
    /// Response content: `[image?, summary text, metadata JSON text]`.
    #[tool(
        name = "screenshot_app",
        description = "Capture a screenshot of a macOS application's front window. Returns the \
                       PNG path, optionally the image itself (includeImage) and copies it to the \
                       clipboard on request (copyToClipboard)."
    )]
    pub async fn screenshot_app(
        &self,
        Parameters(params): Parameters<ScreenshotAppParams>,
    ) -> Result<CallToolResult, McpError> {
        let mode = params.display.unwrap_or_default();
        let copy = params.copy_to_clipboard.unwrap_or(false);
        let include_image = params.include_image.unwrap_or(false);
        info!(tool = "screenshot_app", app = %params.app, %mode, copy, include_image, "start");

        // Fresh temp directory per call
        let request = CaptureRequest::builder(params.app.as_str())
            .build()
            .map_err(convert_error_to_mcp)?;

        let path = self
            .backend
            .capturer
            .capture_application_window(&request)
            .await
            .map_err(|error| {
                warn!(tool = "screenshot_app", %error, "capture failed");
                convert_error_to_mcp(error)
            })?;

        if copy {
            self.backend.clipboard.copy_png(&path).await.map_err(convert_error_to_mcp)?;
        }

        let image_data = if include_image {
            Some(std::fs::read(&path).map_err(|e| convert_error_to_mcp(AppshotError::Io(e)))?)
        } else {
            None
        };

        debug!(tool = "screenshot_app", path = %path.display(), "ok");
        Ok(build_screenshot_result(&path, mode, copy, image_data.as_deref()))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for AppshotMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Use screenshot_app with the exact macOS application name to capture its front \
                 window. Requires Screen Recording and Accessibility permission for the host \
                 process."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
