//! Base64 helpers for terminal payloads and MCP image content

use std::{fs, path::Path};

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::AppshotResult;

/// Standard, padded base64 of `data`
pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Reads the whole file at `path` and base64-encodes it
pub fn file_to_base64(path: &Path) -> AppshotResult<String> {
    let bytes = fs::read(path)?;
    Ok(to_base64(&bytes))
}

/// First `max_chars` characters of `encoded`
///
/// Base64 text is ASCII, so slicing by bytes is slicing by characters.
///
/// # Examples
///
/// ```
/// use appshot_core::util::encode::preview;
///
/// assert_eq!(preview("QUJDREVG", 4), "QUJD");
/// assert_eq!(preview("QUI=", 80), "QUI=");
/// ```
pub fn preview(encoded: &str, max_chars: usize) -> &str {
    match encoded.char_indices().nth(max_chars) {
        Some((idx, _)) => &encoded[..idx],
        None => encoded,
    }
}
