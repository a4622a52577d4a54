use crate::error::ClipboardError;
use arboard::Clipboard;
use tracing::debug;

/// Read/write access to a clipboard. Failures are never fatal to a session.
pub trait ClipboardBridge {
    fn write(&mut self, text: &str) -> Result<(), ClipboardError>;
    fn read(&mut self) -> Result<String, ClipboardError>;
}

impl<T: ClipboardBridge + ?Sized> ClipboardBridge for Box<T> {
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write(text)
    }

    fn read(&mut self) -> Result<String, ClipboardError> {
        (**self).read()
    }
}

/// The desktop clipboard via `arboard`.
///
/// The handle is opened on first use; headless sessions without a clipboard
/// see an error per attempt rather than at startup.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: None }
    }

    fn handle(&mut self) -> Result<&mut Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard = Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            debug!(target: "editor.clipboard", "system clipboard opened");
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("no clipboard handle".to_string()))
    }
}

impl ClipboardBridge for SystemClipboard {
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Access(e.to_string()))
    }

    fn read(&mut self) -> Result<String, ClipboardError> {
        self.handle()?
            .get_text()
            .map_err(|e| ClipboardError::Access(e.to_string()))
    }
}

/// Process-local clipboard.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self { contents: None }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ClipboardBridge for MemoryClipboard {
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }

    fn read(&mut self) -> Result<String, ClipboardError> {
        Ok(self.contents.clone().unwrap_or_default())
    }
}

/// Normalizes line endings and drops NUL characters. Everything else is
/// pasted as it was copied.
pub fn sanitize_paste_text(text: &str) -> String {
    let mut normalized = crate::document_model::text_buffer::normalize_line_endings(text);
    normalized.retain(|c| c != '\0');
    normalized
}
