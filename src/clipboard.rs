use anyhow::{Context, Result};
use arboard::Clipboard;

/// Places `text` on the system clipboard.
///
/// Returns `Ok(false)` when no clipboard can be opened, e.g. on a headless
/// session.
pub fn copy(text: &str) -> Result<bool> {
    let mut clipboard = match Clipboard::new() {
        Ok(clipboard) => clipboard,
        Err(e) => {
            tracing::warn!(error = %e, "clipboard unavailable");
            return Ok(false);
        }
    };

    clipboard
        .set_text(text)
        .context("Failed to copy password to clipboard")?;

    tracing::debug!("password copied to clipboard");
    Ok(true)
}
