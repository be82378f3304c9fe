//! File system file port
//!
//! Imports and exports sheets as CSV files under a base directory.
//!
//! File names are confined to the base directory: `..` and other non-name
//! components are refused with `PermissionDenied`.

use super::FilePort;
use super::file::{csv_to_grid, download_name, grid_to_csv};
use crate::error::PortError;
use crate::models::Grid;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File port rooted at a directory
pub struct FileSystemFilePort {
    base_path: PathBuf,
    sheet_name: String,
}

impl FileSystemFilePort {
    /// Create a file port confined to `base_path`
    ///
    /// # Example
    ///
    /// ```rust
    /// use table_interchange::ports::FileSystemFilePort;
    ///
    /// let port = FileSystemFilePort::new("exports").with_sheet_name("People");
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            sheet_name: "Sheet1".to_string(),
        }
    }

    /// Name given to imported sheets
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a file name onto a path inside the base directory
    ///
    /// A leading `/` is ignored. Only plain name components are accepted, and
    /// the deepest existing ancestor must canonicalize to somewhere under the
    /// base directory, which catches symlinks pointing out of it.
    fn resolve_path(&self, file: &str) -> Result<PathBuf, PortError> {
        let relative = Path::new(file.trim_start_matches('/'));
        if relative
            .components()
            .any(|part| !matches!(part, Component::Normal(_)))
        {
            return Err(PortError::PermissionDenied(format!(
                "'{}' leaves the export directory",
                file
            )));
        }

        let target = self.base_path.join(relative);
        let root = self
            .base_path
            .canonicalize()
            .unwrap_or_else(|_| self.base_path.clone());

        if let Some(existing) = target.ancestors().find(|p| p.exists()) {
            let resolved = existing.canonicalize()?;
            if !resolved.starts_with(&root) {
                return Err(PortError::PermissionDenied(format!(
                    "'{}' resolves outside the export directory",
                    file
                )));
            }
        }

        Ok(target)
    }
}

#[async_trait(?Send)]
impl FilePort for FileSystemFilePort {
    async fn import_from(&self, file: &str) -> Result<Grid, PortError> {
        let full_path = self.resolve_path(file)?;

        let bytes = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PortError::NotFound(file.to_string())
            } else {
                PortError::Io(format!("Failed to read file {}: {}", file, e))
            }
        })?;

        let grid = csv_to_grid(&bytes, &self.sheet_name)?;
        debug!(file, rows = grid.cells.len(), "Imported sheet");
        Ok(grid)
    }

    async fn export_to(&self, grid: &Grid, filename: &str) -> Result<(), PortError> {
        let target = download_name(filename);
        let full_path = self.resolve_path(&target)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                PortError::Io(format!("Failed to create directory for {}: {}", target, e))
            })?;
        }

        let bytes = grid_to_csv(grid)?;
        fs::write(&full_path, bytes)
            .await
            .map_err(|e| PortError::Io(format!("Failed to write file {}: {}", target, e)))?;

        info!(file = %target, rows = grid.cells.len(), "Exported sheet");
        Ok(())
    }
}
