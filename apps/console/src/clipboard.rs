use anyhow::Context;
use arboard::Clipboard as SystemClipboard;

/// System clipboard via `arboard`, opened per write so a headless session only fails the copy.
#[derive(Debug, Default)]
pub struct ArboardClipboard;

impl client_core::Clipboard for ArboardClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        let mut clipboard = SystemClipboard::new().context("failed to open system clipboard")?;
        clipboard
            .set_text(text.to_string())
            .context("failed to write to system clipboard")
    }
}
