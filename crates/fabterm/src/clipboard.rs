//! System clipboard access

use fabterm_tutorial::{Clipboard, TutorialError};
use tracing::debug;

/// Clipboard backed by `arboard`, connected on first use
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn connect(&mut self) -> Result<&mut arboard::Clipboard, TutorialError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| TutorialError::Clipboard(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| TutorialError::Clipboard("not connected".into()))
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), TutorialError> {
        let clipboard = self.connect()?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| TutorialError::Clipboard(e.to_string()))?;
        debug!(len = text.len(), "Copied to clipboard");
        Ok(())
    }
}
