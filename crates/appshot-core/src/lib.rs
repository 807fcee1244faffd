//! appshot-core: application window capture and terminal image rendering
//!
//! This library captures the front window of a named macOS application by
//! driving the system's window-scripting and screen-capture tools, then
//! delivers the resulting PNG inline in the terminal, as a path, or as
//! base64 text. The CLI and MCP server crates are thin adapters over it.

pub mod capture;
pub mod clipboard;
pub mod error;
pub mod model;
pub mod process;
pub mod render;
pub mod util;
