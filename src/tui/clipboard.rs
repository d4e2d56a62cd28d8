//! System clipboard access through `arboard`.
//!
//! A clipboard handle is opened per copy and dropped right after.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Copy text to the system clipboard
///
/// Fails without a display server (headless Linux) or when access is denied.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")?;
    Ok(())
}

/// The log tail as copied or exported: one line per entry
pub fn logs_text<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    lines.into_iter().collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_are_newline_joined() {
        assert_eq!(logs_text(["a", "b"]), "a\nb");
        assert_eq!(logs_text(std::iter::empty()), "");
    }
}
