//! appshot-mcp-server: MCP protocol layer over appshot-core
//!
//! Exposes a single tool, `screenshot_app`, over stdio. All capture logic
//! lives in `appshot-core`; this crate only validates arguments, maps errors
//! onto MCP error codes and shapes the tool result.

pub mod mcp;
pub mod mcp_content;
pub mod shutdown;
