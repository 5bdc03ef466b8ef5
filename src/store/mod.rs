//! Persisted local key-value state.
//!
//! The dashboard keeps a small amount of state across runs: the session,
//! cached per-year budget data and last-submitted form values. Collections
//! are fjall partitions when the keyspace opens, volatile maps otherwise;
//! callers never deal with storage failures, only with absent values.

pub mod disk;
pub mod memory;

use async_trait::async_trait;
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
    time::Duration,
};
use tracing::debug;

/// Collection holding the persisted session.
pub const SESSION_COLLECTION: &str = "session";
/// Collection holding cached per-year budget summaries.
pub const BUDGET_COLLECTION: &str = "budgets";
/// Collection holding last-submitted form values.
pub const FORM_COLLECTION: &str = "forms";

#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;
    async fn put(&self, key: &str, value: Value, ttl: Option<Duration>);
    async fn remove(&self, key: &str);
    async fn clear(&self);
}

/// Reads and deserializes a value, treating malformed entries as absent.
pub async fn get_typed<T: DeserializeOwned>(
    collection: &dyn KeyValueCollection,
    key: &str,
) -> Option<T> {
    let value = collection.get(key).await?;
    match serde_json::from_value(value) {
        Ok(typed) => Some(typed),
        Err(e) => {
            debug!("Discarding malformed entry for key {key}: {e}");
            None
        }
    }
}

/// Serializes and writes a value. Serialization failures are logged and
/// dropped; persistence is best-effort by contract.
pub async fn put_typed<T: Serialize>(
    collection: &dyn KeyValueCollection,
    key: &str,
    value: &T,
    ttl: Option<Duration>,
) {
    match serde_json::to_value(value) {
        Ok(json) => collection.put(key, json, ttl).await,
        Err(e) => debug!("Failed to serialize entry for key {key}: {e}"),
    }
}

/// A thread-safe key-value store holding named collections.
pub struct KeyValueStore {
    keyspace: Option<Keyspace>,
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
}

impl KeyValueStore {
    /// Opens the store under the given data directory. When the keyspace
    /// cannot be opened every collection silently degrades to memory.
    pub fn open(data_path: &Path) -> Self {
        let store_dir = data_path.join("store");
        let keyspace = fjall::Config::new(&store_dir).open().ok();
        if keyspace.is_none() {
            debug!(
                "Could not open keyspace at {}, falling back to memory",
                store_dir.display()
            );
        }
        Self {
            keyspace,
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// A store with no disk backing at all.
    pub fn in_memory() -> Self {
        Self {
            keyspace: None,
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the named collection, creating it on first access.
    pub fn collection(&self, name: &str) -> Arc<dyn KeyValueCollection> {
        {
            let collections = self.collections.read().unwrap();
            if let Some(existing) = collections.get(name) {
                return Arc::clone(existing);
            }
        }

        let created: Arc<dyn KeyValueCollection> = self
            .keyspace
            .as_ref()
            .and_then(|ks| {
                ks.open_partition(name, PartitionCreateOptions::default())
                    .ok()
                    .map(|partition| {
                        Arc::new(DiskCollection::new(partition)) as Arc<dyn KeyValueCollection>
                    })
            })
            .unwrap_or_else(|| Arc::new(MemoryCollection::new()));

        let mut collections = self.collections.write().unwrap();
        Arc::clone(
            collections
                .entry(name.to_string())
                .or_insert_with(|| created),
        )
    }
}
