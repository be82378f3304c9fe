//! Clipboard port implementations

use super::ClipboardPort;
use crate::error::PortError;
use crate::models::ClipboardPayload;
use async_trait::async_trait;
use std::io::{Read, Write};
use std::sync::Mutex;
use tracing::{debug, warn};

/// In-process clipboard
///
/// Reading an empty clipboard yields an empty payload.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Mutex<Option<ClipboardPayload>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard pre-filled with plain text
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(Some(ClipboardPayload::text(text))),
        }
    }

    /// Current content, if anything was written
    pub fn contents(&self) -> Option<ClipboardPayload> {
        self.content.lock().ok().and_then(|c| c.clone())
    }
}

#[async_trait(?Send)]
impl ClipboardPort for MemoryClipboard {
    async fn read(&self) -> Result<ClipboardPayload, PortError> {
        let content = self
            .content
            .lock()
            .map_err(|_| PortError::Unavailable("clipboard lock poisoned".to_string()))?;
        Ok(content.clone().unwrap_or_default())
    }

    async fn write(&self, payload: &ClipboardPayload) -> Result<(), PortError> {
        let mut content = self
            .content
            .lock()
            .map_err(|_| PortError::Unavailable("clipboard lock poisoned".to_string()))?;
        *content = Some(payload.clone());
        Ok(())
    }
}

/// Primary clipboard with a single legacy fallback
///
/// Each read or write tries `primary` first. On failure it logs a warning and
/// tries `legacy` exactly once; a legacy failure is returned as is.
pub struct FallbackClipboard<P, L> {
    primary: P,
    legacy: L,
}

impl<P: ClipboardPort, L: ClipboardPort> FallbackClipboard<P, L> {
    pub fn new(primary: P, legacy: L) -> Self {
        Self { primary, legacy }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn legacy(&self) -> &L {
        &self.legacy
    }
}

#[async_trait(?Send)]
impl<P: ClipboardPort, L: ClipboardPort> ClipboardPort for FallbackClipboard<P, L> {
    async fn read(&self) -> Result<ClipboardPayload, PortError> {
        match self.primary.read().await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                warn!(error = %e, "Clipboard read failed, using legacy method");
                self.legacy.read().await
            }
        }
    }

    async fn write(&self, payload: &ClipboardPayload) -> Result<(), PortError> {
        match self.primary.write(payload).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Clipboard write failed, using legacy method");
                self.legacy.write(payload).await
            }
        }
    }
}

/// Manual-entry clipboard on the process's standard streams
///
/// Reads the whole of stdin as text and writes payload text to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioClipboard;

#[async_trait(?Send)]
impl ClipboardPort for StdioClipboard {
    async fn read(&self) -> Result<ClipboardPayload, PortError> {
        let mut text = String::new();
        std::io::stdin().lock().read_to_string(&mut text)?;
        debug!(bytes = text.len(), "Read clipboard text from stdin");
        Ok(ClipboardPayload::text(text))
    }

    async fn write(&self, payload: &ClipboardPayload) -> Result<(), PortError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", payload.text)?;
        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Broken {
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl ClipboardPort for Broken {
        async fn read(&self) -> Result<ClipboardPayload, PortError> {
            self.calls.set(self.calls.get() + 1);
            Err(PortError::PermissionDenied("clipboard-read".to_string()))
        }

        async fn write(&self, _payload: &ClipboardPayload) -> Result<(), PortError> {
            self.calls.set(self.calls.get() + 1);
            Err(PortError::Unavailable("no clipboard".to_string()))
        }
    }

    fn broken() -> Broken {
        Broken {
            calls: Cell::new(0),
        }
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_memory_clipboard_round_trip() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(block_on(clipboard.read()).unwrap().text, "");

        block_on(clipboard.write(&ClipboardPayload::text("a\tb"))).unwrap();
        assert_eq!(block_on(clipboard.read()).unwrap().text, "a\tb");
    }

    #[test]
    fn test_fallback_degrades_once() {
        let clipboard = FallbackClipboard::new(broken(), MemoryClipboard::with_text("x"));
        assert_eq!(block_on(clipboard.read()).unwrap().text, "x");

        block_on(clipboard.write(&ClipboardPayload::text("y"))).unwrap();
        assert_eq!(clipboard.legacy().contents().unwrap().text, "y");
        assert_eq!(clipboard.primary().calls.get(), 2);
    }

    #[test]
    fn test_fallback_fails_when_both_fail() {
        let clipboard = FallbackClipboard::new(broken(), broken());
        let err = block_on(clipboard.read()).unwrap_err();

        assert!(matches!(err, PortError::PermissionDenied(_)));
        assert_eq!(clipboard.primary().calls.get(), 1);
        assert_eq!(clipboard.legacy().calls.get(), 1);
    }
}
