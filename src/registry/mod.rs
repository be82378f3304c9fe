//! Named table adapter factories
//!
//! [`AdapterRegistry`] maps names to factories. A process-wide registry is
//! available once [`init`] has been called; it starts with the built-in
//! `"memory"` factory.
//!
//! ```
//! use table_interchange::registry::{self, AdapterConfig};
//!
//! registry::init();
//! assert!(registry::is_adapter_registered("memory"));
//!
//! let table = registry::create_adapter("memory", AdapterConfig::new("people")).unwrap();
//! assert_eq!(table.name(), "people");
//! ```

use crate::error::{TransferError, TransferResult};
use crate::models::{Column, TableSnapshot};
use crate::ports::{MemoryTable, TableAdapter};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Builds an adapter from a configuration
pub type AdapterFactory =
    Arc<dyn Fn(AdapterConfig) -> Result<Box<dyn TableAdapter>, TransferError> + Send + Sync>;

/// Input handed to an adapter factory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterConfig {
    /// Instance name
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Initial rows as JSON objects keyed by column key
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    /// Whether the table supports row selection
    #[serde(default)]
    pub selectable: bool,
}

impl AdapterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_data(mut self, data: Vec<serde_json::Value>) -> Self {
        self.data = data;
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }
}

/// Registry of adapter factories by name
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    factories: BTreeMap<String, AdapterFactory>,
}

impl AdapterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in factories
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("memory", memory_factory);
        registry
    }

    /// Register a factory, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(AdapterConfig) -> Result<Box<dyn TableAdapter>, TransferError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn create(&self, name: &str, config: AdapterConfig) -> TransferResult<Box<dyn TableAdapter>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| TransferError::UnknownAdapter(name.to_string()))?;
        factory(config)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn memory_factory(config: AdapterConfig) -> Result<Box<dyn TableAdapter>, TransferError> {
    let snapshot = TableSnapshot::from_json_rows(config.columns, &config.data);
    let table = if config.selectable {
        MemoryTable::selectable(config.name, snapshot.columns, snapshot.rows)
    } else {
        MemoryTable::new(config.name, snapshot.columns, snapshot.rows)
    };
    Ok(Box::new(table))
}

static GLOBAL: OnceCell<RwLock<AdapterRegistry>> = OnceCell::new();

/// Initialize the process-wide registry; later calls do nothing
pub fn init() {
    GLOBAL.get_or_init(|| {
        info!("Initialized adapter registry");
        RwLock::new(AdapterRegistry::with_builtins())
    });
}

fn global() -> TransferResult<&'static RwLock<AdapterRegistry>> {
    GLOBAL
        .get()
        .ok_or_else(|| TransferError::Config("adapter registry not initialized".to_string()))
}

fn poisoned<T>(_: T) -> TransferError {
    TransferError::Config("adapter registry lock poisoned".to_string())
}

/// Register a factory in the process-wide registry
pub fn register_adapter<F>(name: impl Into<String>, factory: F) -> TransferResult<()>
where
    F: Fn(AdapterConfig) -> Result<Box<dyn TableAdapter>, TransferError> + Send + Sync + 'static,
{
    let name = name.into();
    global()?.write().map_err(poisoned)?.register(name.clone(), factory);
    info!("Registered adapter '{}'", name);
    Ok(())
}

/// Create an adapter from the process-wide registry
pub fn create_adapter(name: &str, config: AdapterConfig) -> TransferResult<Box<dyn TableAdapter>> {
    // lock is released before the factory runs
    let factory = global()?
        .read()
        .map_err(poisoned)?
        .factories
        .get(name)
        .cloned()
        .ok_or_else(|| TransferError::UnknownAdapter(name.to_string()))?;
    factory(config)
}

/// Names in the process-wide registry; empty before [`init`]
pub fn registered_adapter_names() -> Vec<String> {
    GLOBAL
        .get()
        .and_then(|lock| lock.read().ok().map(|r| r.names()))
        .unwrap_or_default()
}

pub fn is_adapter_registered(name: &str) -> bool {
    GLOBAL
        .get()
        .and_then(|lock| lock.read().ok().map(|r| r.contains(name)))
        .unwrap_or(false)
}
