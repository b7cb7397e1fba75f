//! Wholesale persistence of rows and the history log.
//!
//! Values are JSON documents stored under string keys and always read or
//! written in full. Corrupt data never reaches the caller as an error: it is
//! logged and replaced by the supplied default.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::commit::HistoryLog;
#[cfg(target_arch = "wasm32")]
use crate::error::GridError;
use crate::error::Result;
use crate::types::{HistoryEntry, Row};

/// A string key/value store (browser `localStorage`, a map in memory, ...).
pub trait KvStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store, used natively and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// The browser's `window.localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| GridError::Storage("no window".into()))?
            .local_storage()
            .map_err(|e| GridError::Storage(format!("{e:?}")))?
            .ok_or_else(|| GridError::Storage("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KvStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| GridError::Storage(format!("{e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| GridError::Storage(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| GridError::Storage(format!("{e:?}")))
    }
}

/// Read the JSON document under `key`, falling back to `default` when it is
/// missing, unreadable or malformed.
fn load_or<T, F>(store: &dyn KvStore, key: &str, default: F) -> T
where
    T: serde::de::DeserializeOwned,
    F: FnOnce() -> T,
{
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default(),
        Err(e) => {
            log::warn!("storage: reading {key} failed: {e}");
            return default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("storage: {key} holds malformed data, using defaults: {e}");
            default()
        }
    }
}

/// Rows stored under `key`, or `default`.
pub fn load_rows(store: &dyn KvStore, key: &str, default: Vec<Row>) -> Vec<Row> {
    load_or(store, key, || default)
}

pub fn save_rows(store: &dyn KvStore, key: &str, rows: &[Row]) -> Result<()> {
    store.write(key, &serde_json::to_string(rows)?)
}

/// History log stored under `key`, or an empty log.
pub fn load_log(store: &dyn KvStore, key: &str, retention: Option<usize>) -> HistoryLog {
    let entries: Vec<HistoryEntry> = load_or(store, key, Vec::new);
    HistoryLog::from_entries(entries, retention)
}

pub fn save_log(store: &dyn KvStore, key: &str, log: &HistoryLog) -> Result<()> {
    store.write(key, &serde_json::to_string(log.entries())?)
}
