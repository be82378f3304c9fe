//! Error types
//!
//! Codecs and the validator never fail on data-shape problems. Only ports,
//! adapters and hooks produce errors, and the transfer orchestrator is the one
//! place that observes and re-raises them.

use thiserror::Error;

/// Error raised by an external port (clipboard, file, table adapter)
#[derive(Debug, Error)]
pub enum PortError {
    #[error("Port unavailable: {0}")]
    Unavailable(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Format error: {0}")]
    Format(String),
}

impl From<std::io::Error> for PortError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => PortError::NotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => PortError::PermissionDenied(err.to_string()),
            _ => PortError::Io(err.to_string()),
        }
    }
}

impl From<csv::Error> for PortError {
    fn from(err: csv::Error) -> Self {
        PortError::Format(err.to_string())
    }
}

/// Pipeline stage a hook belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    BeforeCopy,
    AfterCopy,
    BeforePaste,
    AfterPaste,
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HookStage::BeforeCopy => "beforeCopy",
            HookStage::AfterCopy => "afterCopy",
            HookStage::BeforePaste => "beforePaste",
            HookStage::AfterPaste => "afterPaste",
        };
        f.write_str(name)
    }
}

/// Error returned by transfer operations
#[derive(Debug, Error)]
pub enum TransferError {
    /// Clipboard or file port failed (after any fallback)
    #[error("Port failure: {0}")]
    Port(#[from] PortError),

    /// Table adapter failed to produce or accept a snapshot
    #[error("Adapter '{adapter}' failed: {source}")]
    Adapter {
        adapter: String,
        #[source]
        source: PortError,
    },

    /// Adapter lacks the capability the operation needs
    #[error("Adapter '{adapter}' does not support {operation}")]
    UnsupportedOperation { adapter: String, operation: String },

    /// A caller-supplied hook failed
    #[error("Hook '{stage}' failed: {source}")]
    Hook {
        stage: HookStage,
        #[source]
        source: anyhow::Error,
    },

    /// Options could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Adapter name not present in the registry
    #[error("Unknown adapter: {0}")]
    UnknownAdapter(String),
}

impl TransferError {
    pub fn unsupported(adapter: &str, operation: &str) -> Self {
        TransferError::UnsupportedOperation {
            adapter: adapter.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, TransferError::UnsupportedOperation { .. })
    }
}

/// Result type for transfer operations
pub type TransferResult<T> = Result<T, TransferError>;
