//! Table Interchange - clipboard and spreadsheet exchange for table widgets
//!
//! Provides unified interfaces for:
//! - Scalar, delimited-text and grid codecs between typed snapshots and
//!   their external forms
//! - Type and rule based validation of snapshots
//! - Ports for tables, the clipboard and spreadsheet files
//! - A transfer orchestrator sequencing copy, paste, import and export
//! - A registry of named table adapter factories
//!
//! # Example
//!
//! ```rust
//! use table_interchange::models::{Column, DataType};
//! use table_interchange::ports::{MemoryClipboard, MemoryFilePort};
//! use table_interchange::transfer::TransferOrchestrator;
//!
//! let columns = vec![
//!     Column::new("name", "Name").with_type(DataType::String),
//!     Column::new("age", "Age").with_type(DataType::Number),
//! ];
//! let clipboard = MemoryClipboard::with_text("Name\tAge\nAlice\t30");
//! let orchestrator = TransferOrchestrator::new(clipboard, MemoryFilePort::new());
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let pasted = runtime.block_on(orchestrator.paste_from_clipboard(&columns)).unwrap();
//! assert!(pasted.report.valid);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod ports;
pub mod registry;
pub mod transfer;
pub mod validation;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use config::{Quoting, TransferOptions, ValueTransforms};
pub use error::{PortError, TransferError, TransferResult};
pub use models::{CellValue, ClipboardPayload, Column, DataType, Grid, Row, RowId, TableSnapshot};
pub use ports::{
    ClipboardPort, FallbackClipboard, FilePort, MemoryClipboard, MemoryFilePort, MemoryTable,
    SelectionSupport, StdioClipboard, TableAdapter,
};
#[cfg(feature = "native-fs")]
pub use ports::FileSystemFilePort;
pub use registry::{AdapterConfig, AdapterRegistry};
pub use transfer::{NoHooks, Pasted, TransferHooks, TransferOrchestrator};
pub use validation::{CellError, DataValidator, ValidationReport, ValidationRule};
