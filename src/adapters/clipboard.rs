use crate::domain::ports::Clipboard;
use crate::utils::error::{ParseError, Result};
use parking_lot::Mutex;

/// In-process clipboard for headless runs and tests.
#[derive(Debug)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    available: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self {
            contents: Mutex::new(None),
            available: true,
        }
    }

    /// A clipboard that rejects every write, like a headless session.
    pub fn unavailable() -> Self {
        Self {
            contents: Mutex::new(None),
            available: false,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        if !self.available {
            return Err(ParseError::IoError(std::io::Error::other(
                "clipboard is not available",
            )));
        }
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

/// The desktop clipboard.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[cfg(feature = "cli")]
impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ParseError::IoError(std::io::Error::other(e.to_string())))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ParseError::IoError(std::io::Error::other(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_round_trip() {
        let clipboard = MemoryClipboard::new();
        assert!(clipboard.contents().is_none());
        clipboard.set_text("{}\n").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("{}\n"));
    }

    #[test]
    fn test_unavailable_clipboard_errors() {
        let clipboard = MemoryClipboard::unavailable();
        assert!(clipboard.set_text("x").is_err());
        assert!(clipboard.contents().is_none());
    }
}
