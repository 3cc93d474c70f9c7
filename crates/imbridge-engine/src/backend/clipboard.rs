/// Text clipboard access.
pub trait Clipboard {
    fn get_text(&mut self) -> Option<String>;
    fn set_text(&mut self, text: &str);
}

/// Process-local clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_owned());
    }
}

/// OS clipboard via `arboard`.
///
/// When the platform clipboard cannot be opened (headless CI, no display
/// server) text is kept in a [`MemoryClipboard`] instead.
pub struct SystemClipboard {
    system: Option<arboard::Clipboard>,
    fallback: MemoryClipboard,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let system = match arboard::Clipboard::new() {
            Ok(cb) => Some(cb),
            Err(e) => {
                log::warn!("system clipboard unavailable, using in-memory clipboard: {e}");
                None
            }
        };
        Self {
            system,
            fallback: MemoryClipboard::new(),
        }
    }

    #[inline]
    pub fn is_system(&self) -> bool {
        self.system.is_some()
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        let Some(cb) = self.system.as_mut() else {
            return self.fallback.get_text();
        };
        match cb.get_text() {
            Ok(text) => Some(text),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(e) => {
                log::warn!("clipboard read failed: {e}");
                None
            }
        }
    }

    fn set_text(&mut self, text: &str) {
        let Some(cb) = self.system.as_mut() else {
            self.fallback.set_text(text);
            return;
        };
        if let Err(e) = cb.set_text(text) {
            log::warn!("clipboard write failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_starts_empty() {
        let mut cb = MemoryClipboard::new();
        assert_eq!(cb.get_text(), None);
    }

    #[test]
    fn memory_clipboard_round_trips_last_value() {
        let mut cb = MemoryClipboard::new();
        cb.set_text("first");
        cb.set_text("second");
        assert_eq!(cb.get_text().as_deref(), Some("second"));
    }
}
