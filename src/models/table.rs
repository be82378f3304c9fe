//! Rows and table snapshots

use super::column::Column;
use super::value::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque row identifier, unique within one snapshot
///
/// Identity is the row's source position unless the source supplies its own
/// id. It is not stable across conversions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Index(usize),
    Key(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Index(i) => write!(f, "{}", i),
            RowId::Key(k) => f.write_str(k),
        }
    }
}

/// One row of a snapshot: column key -> value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(default)]
    pub values: BTreeMap<String, CellValue>,
    /// Raw text of cells that a typed decode turned into `Null`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rejected: BTreeMap<String, String>,
}

impl Row {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            values: BTreeMap::new(),
            rejected: BTreeMap::new(),
        }
    }

    /// Row with a positional id
    pub fn at(index: usize) -> Self {
        Self::new(RowId::Index(index))
    }

    /// Builder-style setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Value for `key`; a missing key reads as `Null`
    pub fn get(&self, key: &str) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.values.get(key).unwrap_or(&NULL)
    }

    /// Raw token rejected by a typed decode for `key`, if any
    pub fn rejected_token(&self, key: &str) -> Option<&str> {
        self.rejected.get(key).map(String::as_str)
    }
}

/// Point-in-time capture of a table's rows and columns
///
/// Snapshots are the unit of transfer for one operation. Every row's keys
/// should be a subset of the column keys; missing keys are treated as null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub rows: Vec<Row>,
    pub columns: Vec<Column>,
}

impl TableSnapshot {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { rows, columns }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Value at (row, key); out of range or missing reads as `Null`
    pub fn value(&self, row: usize, key: &str) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.rows.get(row).map(|r| r.get(key)).unwrap_or(&NULL)
    }

    /// Row keys that are not declared columns
    pub fn undeclared_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .rows
            .iter()
            .flat_map(|r| r.values.keys())
            .filter(|k| self.column(k).is_none())
            .cloned()
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Build a snapshot from JSON objects, as UI data sources hold them
    ///
    /// Only declared column keys are taken. An `id` property becomes the row
    /// id; otherwise the array position is used. Non-object entries become
    /// empty rows.
    pub fn from_json_rows(columns: Vec<Column>, rows: &[serde_json::Value]) -> Self {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let id = match value.get("id") {
                    Some(serde_json::Value::String(s)) => RowId::Key(s.clone()),
                    Some(serde_json::Value::Number(n)) => match n.as_u64() {
                        Some(u) => RowId::Index(u as usize),
                        None => RowId::Key(n.to_string()),
                    },
                    _ => RowId::Index(index),
                };
                let mut row = Row::new(id);
                for column in &columns {
                    if let Some(cell) = value.get(&column.key) {
                        row.set(column.key.clone(), CellValue::from_json(cell));
                    }
                }
                row
            })
            .collect();
        Self { rows, columns }
    }

    /// JSON objects keyed by column key, in column order
    pub fn to_json_rows(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut object = serde_json::Map::new();
                for column in &self.columns {
                    object.insert(column.key.clone(), row.get(&column.key).to_json());
                }
                serde_json::Value::Object(object)
            })
            .collect()
    }
}
