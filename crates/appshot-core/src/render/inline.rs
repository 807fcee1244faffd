//! Inline image escape sequences
//!
//! iTerm2 and kitty accept the image bytes in-band; WezTerm is driven through
//! its own `imgcat` subcommand instead (see [`super::ImageRenderer`]).

use crate::util::encode::to_base64;

/// OSC 1337 inline file transfer: `ESC ] 1337 ; File=name=<b64name>;inline=1:<b64data> BEL`
///
/// The file name is itself base64-encoded. A trailing newline moves the
/// cursor below the image.
///
/// # Examples
///
/// ```
/// use appshot_core::render::inline::iterm_sequence;
///
/// let seq = iterm_sequence("a.png", "AAAA");
/// assert_eq!(seq, "\x1b]1337;File=name=YS5wbmc=;inline=1:AAAA\x07\n");
/// ```
pub fn iterm_sequence(file_name: &str, encoded: &str) -> String {
    let name = to_base64(file_name.as_bytes());
    format!("\x1b]1337;File=name={name};inline=1:{encoded}\x07\n")
}

/// kitty graphics protocol, PNG transmitted and displayed in one command
///
/// `f=100` marks the payload as PNG, `a=T` transmits and places it.
pub fn kitty_sequence(encoded: &str) -> String {
    format!("\x1b_Gf=100,a=T;{encoded}\x1b\\\n")
}

/// Appends a newline unless `text` already ends with one
pub fn ensure_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
