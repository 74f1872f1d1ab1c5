use std::sync::Mutex;

use thiserror::Error;

pub const COPIED_STATUS: &str = "Copied to clipboard!";

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write clipboard: {0}")]
    Write(String),
}

pub trait ClipboardPort: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard. The handle is opened on first use and kept until drop,
/// since on X11/Wayland the owning handle serves the contents.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Mutex<Option<arboard::Clipboard>>,
}

impl ClipboardPort for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if handle.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
            *handle = Some(clipboard);
        }

        let Some(clipboard) = handle.as_mut() else {
            return Err(ClipboardError::Unavailable(
                "clipboard handle missing".to_string(),
            ));
        };
        clipboard
            .set_text(text.to_string())
            .map_err(|err| ClipboardError::Write(err.to_string()))
    }
}

/// In-process clipboard for tests and headless runs.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ClipboardPort for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text.to_string());
        Ok(())
    }
}
