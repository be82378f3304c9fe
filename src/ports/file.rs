//! Grid file helpers and the in-memory file port
//!
//! Sheets are stored as CSV. Export quotes every cell; import keeps every
//! field as trimmed text (blank fields are null) and drops blank lines.
//! Typing happens later, against the declared columns.

use super::FilePort;
use crate::error::PortError;
use crate::models::{CellValue, Grid};
use async_trait::async_trait;
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// Name a download gets on disk: `.xlsx` becomes `.csv`
pub fn download_name(filename: &str) -> String {
    match filename.strip_suffix(".xlsx") {
        Some(stem) => format!("{}.csv", stem),
        None => filename.to_string(),
    }
}

/// Encode a grid as CSV bytes, quoting every cell
pub fn grid_to_csv(grid: &Grid) -> Result<Vec<u8>, PortError> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    for row in &grid.cells {
        writer.write_record(row.iter().map(CellValue::to_text))?;
    }

    writer
        .into_inner()
        .map_err(|e| PortError::Io(format!("Failed to flush CSV: {}", e)))
}

/// Decode CSV bytes into a grid named `sheet_name`
pub fn csv_to_grid(bytes: &[u8], sheet_name: &str) -> Result<Grid, PortError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut cells = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        cells.push(record.iter().map(raw_cell).collect());
    }

    Ok(Grid::new(sheet_name, cells))
}

fn raw_cell(field: &str) -> CellValue {
    match field.trim() {
        "" => CellValue::Null,
        text => CellValue::String(text.to_string()),
    }
}

/// A download recorded by [`MemoryFilePort`]
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub filename: String,
    pub grid: Grid,
}

/// File port backed by a map of named grids
///
/// Exports are recorded in order instead of being written anywhere.
#[derive(Debug, Default)]
pub struct MemoryFilePort {
    files: Mutex<HashMap<String, Grid>>,
    downloads: Mutex<Vec<Download>>,
}

impl MemoryFilePort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grid under a file name
    pub fn with_file(self, name: impl Into<String>, grid: Grid) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(name.into(), grid);
        }
        self
    }

    /// Register CSV text under a file name
    pub fn with_csv(self, name: impl Into<String>, text: &str) -> Result<Self, PortError> {
        let name = name.into();
        let grid = csv_to_grid(text.as_bytes(), "Sheet1")?;
        Ok(self.with_file(name, grid))
    }

    /// Downloads in the order they were exported
    pub fn downloads(&self) -> Vec<Download> {
        self.downloads
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

#[async_trait(?Send)]
impl FilePort for MemoryFilePort {
    async fn import_from(&self, file: &str) -> Result<Grid, PortError> {
        let files = self
            .files
            .lock()
            .map_err(|_| PortError::Unavailable("file store lock poisoned".to_string()))?;
        files
            .get(file)
            .cloned()
            .ok_or_else(|| PortError::NotFound(file.to_string()))
    }

    async fn export_to(&self, grid: &Grid, filename: &str) -> Result<(), PortError> {
        let mut downloads = self
            .downloads
            .lock()
            .map_err(|_| PortError::Unavailable("download list lock poisoned".to_string()))?;
        info!(filename, rows = grid.cells.len(), "Recorded download");
        downloads.push(Download {
            filename: filename.to_string(),
            grid: grid.clone(),
        });
        Ok(())
    }
}
