//! Per-column value transforms
//!
//! A transform replaces the scalar codec for the columns it is registered
//! for. There is no fallback merge: when an export transform applies, its
//! output is the cell text.

use crate::models::{CellValue, Column};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Export override: typed value -> cell text
pub type ExportFn = Arc<dyn Fn(&CellValue, &Column) -> String + Send + Sync>;

/// Import override: trimmed, non-empty cell text -> typed value
pub type ImportFn = Arc<dyn Fn(&str, &Column) -> CellValue + Send + Sync>;

/// Import and export overrides, keyed by column key
///
/// A catch-all transform applies to every column without a keyed one.
#[derive(Clone, Default)]
pub struct ValueTransforms {
    export: HashMap<String, ExportFn>,
    import: HashMap<String, ImportFn>,
    export_all: Option<ExportFn>,
    import_all: Option<ImportFn>,
}

impl ValueTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export override for one column
    pub fn on_export(
        mut self,
        key: impl Into<String>,
        f: impl Fn(&CellValue, &Column) -> String + Send + Sync + 'static,
    ) -> Self {
        self.export.insert(key.into(), Arc::new(f));
        self
    }

    /// Import override for one column
    pub fn on_import(
        mut self,
        key: impl Into<String>,
        f: impl Fn(&str, &Column) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        self.import.insert(key.into(), Arc::new(f));
        self
    }

    /// Export override for every column
    pub fn on_export_all(
        mut self,
        f: impl Fn(&CellValue, &Column) -> String + Send + Sync + 'static,
    ) -> Self {
        self.export_all = Some(Arc::new(f));
        self
    }

    /// Import override for every column
    pub fn on_import_all(
        mut self,
        f: impl Fn(&str, &Column) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        self.import_all = Some(Arc::new(f));
        self
    }

    pub fn export_for(&self, column: &Column) -> Option<&ExportFn> {
        self.export.get(&column.key).or(self.export_all.as_ref())
    }

    pub fn import_for(&self, column: &Column) -> Option<&ImportFn> {
        self.import.get(&column.key).or(self.import_all.as_ref())
    }
}

impl fmt::Debug for ValueTransforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut export: Vec<&String> = self.export.keys().collect();
        let mut import: Vec<&String> = self.import.keys().collect();
        export.sort();
        import.sort();
        f.debug_struct("ValueTransforms")
            .field("export", &export)
            .field("import", &import)
            .field("export_all", &self.export_all.is_some())
            .field("import_all", &self.import_all.is_some())
            .finish()
    }
}
