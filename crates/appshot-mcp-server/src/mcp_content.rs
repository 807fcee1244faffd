//! MCP content builders for `screenshot_app` results
//!
//! A result carries, in order:
//!
//! 1. an optional inline PNG image block (only when `includeImage` is set)
//! 2. a human-readable summary text block
//! 3. a text block holding the [`ScreenshotMetadata`] JSON object
//!
//! The same metadata object is also set as the result's structured content.
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//!
//! use appshot_core::model::DisplayMode;
//! use appshot_mcp_server::mcp_content::build_screenshot_result;
//!
//! let result = build_screenshot_result(Path::new("/tmp/shot-1.png"), DisplayMode::Auto, false, None);
//! assert!(!result.is_error.unwrap_or(false));
//! assert_eq!(result.content.len(), 2); // summary + metadata
//! ```

use std::path::Path;

use appshot_core::{capture::constants::PNG_MIME_TYPE, model::DisplayMode};
use base64::{Engine, engine::general_purpose::STANDARD};
use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};

/// Structured description of one `screenshot_app` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotMetadata {
    /// Absolute path of the captured PNG
    pub path:                String,
    /// Display mode the caller asked for
    pub display_requested:   DisplayMode,
    /// Whether the PNG was put on the clipboard
    pub copied_to_clipboard: bool,
    /// Whether an image block was attached
    pub include_image:       bool,
    /// Length of the attached base64 data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64_length:       Option<usize>,
}

/// Builds MCP image content from raw image bytes
///
/// ```
/// use appshot_mcp_server::mcp_content::build_image_content;
///
/// let png_data = vec![137, 80, 78, 71, 13, 10, 26, 10];
/// let content = build_image_content(&png_data, "image/png");
/// assert!(content.as_image().is_some());
/// ```
pub fn build_image_content(data: &[u8], mime_type: &str) -> Content {
    Content::image(STANDARD.encode(data), mime_type)
}

/// Space-joined summary sentence for the text block
pub fn summary_text(path: &Path, display: DisplayMode, copied: bool) -> String {
    let mut parts = vec![format!("Screenshot saved to: {}", path.display())];
    if copied {
        parts.push("Copied PNG to clipboard.".to_string());
    }
    if display == DisplayMode::Base64 {
        parts.push("Base64 output suppressed; use includeImage=true if needed.".to_string());
    }
    parts.join(" ")
}

/// Builds the complete tool result
///
/// `image_data` is the PNG to attach, `None` when `includeImage` is off.
pub fn build_screenshot_result(
    path: &Path,
    display: DisplayMode,
    copied: bool,
    image_data: Option<&[u8]>,
) -> CallToolResult {
    let image = image_data.map(|data| build_image_content(data, PNG_MIME_TYPE));
    let base64_length = image.as_ref().and_then(|content| content.as_image()).map(|img| img.data.len());

    let metadata = ScreenshotMetadata {
        path: path.to_string_lossy().into_owned(),
        display_requested: display,
        copied_to_clipboard: copied,
        include_image: image.is_some(),
        base64_length,
    };
    let metadata_value = serde_json::to_value(&metadata).ok();
    let metadata_json = metadata_value
        .as_ref()
        .map(serde_json::Value::to_string)
        .unwrap_or_else(|| r#"{"error": "Failed to serialize metadata"}"#.to_string());

    let mut content = Vec::with_capacity(3);
    content.extend(image);
    content.push(Content::text(summary_text(path, display, copied)));
    content.push(Content::text(metadata_json));

    let mut result = CallToolResult::success(content);
    result.structured_content = metadata_value;
    result
}
