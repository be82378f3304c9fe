//! In-memory table adapter

use super::{SelectionSupport, TableAdapter};
use crate::error::PortError;
use crate::models::{Column, Row, TableSnapshot};
use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
struct TableState {
    snapshot: TableSnapshot,
    selection: Vec<usize>,
}

/// A table held in memory
///
/// Built with [`MemoryTable::new`] it has no selection capability; use
/// [`MemoryTable::selectable`] for one that has.
#[derive(Debug)]
pub struct MemoryTable {
    name: String,
    selectable: bool,
    state: RwLock<TableState>,
}

impl MemoryTable {
    pub fn new(name: impl Into<String>, columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            selectable: false,
            state: RwLock::new(TableState {
                snapshot: TableSnapshot::new(columns, rows),
                selection: Vec::new(),
            }),
        }
    }

    /// Table with an (initially empty) row selection
    pub fn selectable(name: impl Into<String>, columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            selectable: true,
            ..Self::new(name, columns, rows)
        }
    }

    /// Select rows by position; out-of-range positions are ignored on read
    pub fn select(&self, rows: impl IntoIterator<Item = usize>) -> Result<(), PortError> {
        self.write_state()?.selection = rows.into_iter().collect();
        Ok(())
    }

    /// Current contents
    pub fn snapshot(&self) -> Result<TableSnapshot, PortError> {
        Ok(self.read_state()?.snapshot.clone())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, TableState>, PortError> {
        self.state
            .read()
            .map_err(|_| PortError::Unavailable(format!("table '{}' lock poisoned", self.name)))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, TableState>, PortError> {
        self.state
            .write()
            .map_err(|_| PortError::Unavailable(format!("table '{}' lock poisoned", self.name)))
    }
}

#[async_trait(?Send)]
impl TableAdapter for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_snapshot(&self) -> Result<TableSnapshot, PortError> {
        self.snapshot()
    }

    async fn set_snapshot(&self, snapshot: TableSnapshot) -> Result<(), PortError> {
        self.write_state()?.snapshot = snapshot;
        Ok(())
    }

    fn selection(&self) -> Option<&dyn SelectionSupport> {
        self.selectable.then_some(self as &dyn SelectionSupport)
    }
}

#[async_trait(?Send)]
impl SelectionSupport for MemoryTable {
    async fn get_selected_snapshot(&self) -> Result<TableSnapshot, PortError> {
        let state = self.read_state()?;
        let rows = state
            .selection
            .iter()
            .filter_map(|&i| state.snapshot.rows.get(i).cloned())
            .collect();
        Ok(TableSnapshot::new(state.snapshot.columns.clone(), rows))
    }

    async fn set_selected_snapshot(&self, snapshot: TableSnapshot) -> Result<(), PortError> {
        let mut state = self.write_state()?;
        let TableState {
            snapshot: current,
            selection,
        } = &mut *state;

        for (&target, incoming) in selection.iter().zip(snapshot.rows) {
            if let Some(row) = current.rows.get_mut(target) {
                row.values = incoming.values;
                row.rejected = incoming.rejected;
            }
        }
        Ok(())
    }
}
