//! Port abstractions
//!
//! Defines the traits the transfer orchestrator talks to and their
//! implementations:
//! - `TableAdapter` / `SelectionSupport`: the UI table being copied from or
//!   pasted into (`MemoryTable`)
//! - `ClipboardPort`: the system clipboard (`MemoryClipboard`,
//!   `FallbackClipboard`, `StdioClipboard`)
//! - `FilePort`: spreadsheet file import and download (`MemoryFilePort`,
//!   `FileSystemFilePort`)

use crate::error::PortError;
use crate::models::{ClipboardPayload, Grid, TableSnapshot};
use async_trait::async_trait;

pub mod clipboard;
pub mod file;
pub mod memory_table;

#[cfg(feature = "native-fs")]
pub mod filesystem;

pub use clipboard::{FallbackClipboard, MemoryClipboard, StdioClipboard};
pub use file::MemoryFilePort;
#[cfg(feature = "native-fs")]
pub use filesystem::FileSystemFilePort;
pub use memory_table::MemoryTable;

/// A table that snapshots can be read from and written to
///
/// Implementations hold their own state behind `&self`; the orchestrator
/// never keeps a snapshot after handing it over.
#[async_trait(?Send)]
pub trait TableAdapter: Send + Sync {
    /// Name used in logs and capability errors
    fn name(&self) -> &str;

    /// Capture the whole table
    async fn get_snapshot(&self) -> Result<TableSnapshot, PortError>;

    /// Replace the table's contents
    async fn set_snapshot(&self, snapshot: TableSnapshot) -> Result<(), PortError>;

    /// Selection capability, if the table has one
    fn selection(&self) -> Option<&dyn SelectionSupport> {
        None
    }
}

/// Optional capability: read and write the selected rows
#[async_trait(?Send)]
pub trait SelectionSupport {
    async fn get_selected_snapshot(&self) -> Result<TableSnapshot, PortError>;

    /// Write rows into the selection, first row into the first selected row
    async fn set_selected_snapshot(&self, snapshot: TableSnapshot) -> Result<(), PortError>;
}

/// System clipboard
#[async_trait(?Send)]
pub trait ClipboardPort {
    async fn read(&self) -> Result<ClipboardPayload, PortError>;

    async fn write(&self, payload: &ClipboardPayload) -> Result<(), PortError>;
}

/// Spreadsheet file source and download sink
#[async_trait(?Send)]
pub trait FilePort {
    /// Read the first sheet of a file
    async fn import_from(&self, file: &str) -> Result<Grid, PortError>;

    /// Offer a grid for download under `filename`
    async fn export_to(&self, grid: &Grid, filename: &str) -> Result<(), PortError>;
}

#[async_trait(?Send)]
impl<'a, T: ClipboardPort + ?Sized> ClipboardPort for &'a T {
    async fn read(&self) -> Result<ClipboardPayload, PortError> {
        (**self).read().await
    }

    async fn write(&self, payload: &ClipboardPayload) -> Result<(), PortError> {
        (**self).write(payload).await
    }
}

#[async_trait(?Send)]
impl<'a, T: FilePort + ?Sized> FilePort for &'a T {
    async fn import_from(&self, file: &str) -> Result<Grid, PortError> {
        (**self).import_from(file).await
    }

    async fn export_to(&self, grid: &Grid, filename: &str) -> Result<(), PortError> {
        (**self).export_to(grid, filename).await
    }
}
