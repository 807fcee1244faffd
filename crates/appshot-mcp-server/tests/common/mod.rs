//! MCP server test harness
//!
//! Wraps an [`AppshotMcpServer`] over a scripted [`MockRunner`] with helpers
//! for calling `screenshot_app` and picking apart its result.
//!
//! # Usage
//!
//! ```rust,ignore
//! let ctx = McpTestContext::new(MockRunner::macos_happy_path());
//! let result = ctx.screenshot(ScreenshotAppParams { app: "Notes".into(), ..Default::default() }).await?;
//! let parts = ResultParts::split(&result);
//! ```

use std::{path::Path, sync::Arc};

use appshot_core::{capture::ShotBackend, model::PlatformInfo, process::MockRunner};
use appshot_mcp_server::{
    mcp::{AppshotMcpServer, ScreenshotAppParams},
    mcp_content::ScreenshotMetadata,
};
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ErrorData},
};

/// Test fixture around one server instance
pub struct McpTestContext {
    pub server: AppshotMcpServer,
    pub runner: Arc<MockRunner>,
}

impl McpTestContext {
    pub fn new(runner: MockRunner) -> Self {
        let runner = Arc::new(runner);
        let backend = Arc::new(ShotBackend::new(runner.clone(), PlatformInfo::new("macos")));
        Self {
            server: AppshotMcpServer::new(backend),
            runner,
        }
    }

    /// Calls `screenshot_app` with typed parameters
    pub async fn screenshot(&self, params: ScreenshotAppParams) -> Result<CallToolResult, ErrorData> {
        self.server.screenshot_app(Parameters(params)).await
    }

    /// Calls `screenshot_app` with raw JSON arguments, as a client would send them
    pub async fn screenshot_json(&self, arguments: serde_json::Value) -> Result<CallToolResult, ErrorData> {
        let params: ScreenshotAppParams =
            serde_json::from_value(arguments).map_err(|e| ErrorData::invalid_params(e.to_string(), None))?;
        self.screenshot(params).await
    }
}

/// A `screenshot_app` result split into its blocks
pub struct ResultParts {
    /// Base64 image data and mime type, when attached
    pub image:    Option<(String, String)>,
    pub summary:  String,
    pub metadata: ScreenshotMetadata,
}

impl ResultParts {
    pub fn split(result: &CallToolResult) -> Self {
        let (image, rest) = match result.content.first().and_then(|c| c.as_image()) {
            Some(img) => (Some((img.data.clone(), img.mime_type.clone())), &result.content[1..]),
            None => (None, &result.content[..]),
        };
        assert_eq!(rest.len(), 2, "expected summary and metadata blocks");
        let summary = rest[0].as_text().expect("summary is text").text.clone();
        let metadata = serde_json::from_str(&rest[1].as_text().expect("metadata is text").text)
            .expect("metadata is JSON");
        Self {
            image,
            summary,
            metadata,
        }
    }

    /// Removes the per-call capture directory
    pub fn cleanup(&self) {
        if let Some(dir) = Path::new(&self.metadata.path).parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
