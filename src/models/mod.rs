//! Models module
//!
//! Defines the data structures exchanged between table adapters, codecs and
//! ports: columns, typed cells, rows, snapshots, grids and clipboard payloads.

pub mod column;
pub mod grid;
pub mod table;
pub mod value;

pub use column::{Column, DataType};
pub use grid::{ClipboardPayload, Grid};
pub use table::{Row, RowId, TableSnapshot};
pub use value::CellValue;
