use crate::store::KeyValueCollection;
use async_trait::async_trait;
use fjall::PartitionHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, SystemTime};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct Entry {
    value: Value,
    expires_at: Option<SystemTime>,
}

/// Persistent collection backed by one fjall partition.
///
/// Readers must tolerate whatever a previous version (or a crashed write)
/// left behind: any entry that fails to deserialize reads as absent. The
/// store is last-writer-wins; concurrent processes are not coordinated.
pub struct DiskCollection {
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(partition: PartitionHandle) -> Self {
        Self { partition }
    }
}

#[async_trait]
impl KeyValueCollection for DiskCollection {
    async fn get(&self, key: &str) -> Option<Value> {
        let bytes = match self.partition.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Store MISS for key: {key}");
                return None;
            }
            Err(e) => {
                debug!("Store read error for key {key}: {e}");
                return None;
            }
        };

        let entry: Entry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                // Malformed persisted data reads as absent.
                debug!("Malformed store entry for key {key}: {e}");
                return None;
            }
        };

        if let Some(expires_at) = entry.expires_at {
            if SystemTime::now() > expires_at {
                debug!("Store entry expired for key: {key}");
                let _ = self.partition.remove(key);
                return None;
            }
        }
        debug!("Store HIT for key: {key}");
        Some(entry.value)
    }

    async fn put(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let entry = Entry {
            value,
            expires_at: ttl.map(|d| SystemTime::now() + d),
        };
        match serde_json::to_vec(&entry) {
            Ok(bytes) => {
                if let Err(e) = self.partition.insert(key, bytes) {
                    debug!("Store write error for key {key}: {e}");
                } else {
                    debug!("Store PUT for key: {key}");
                }
            }
            Err(e) => debug!("Store serialize error for key {key}: {e}"),
        }
    }

    async fn remove(&self, key: &str) {
        if let Err(e) = self.partition.remove(key) {
            debug!("Store remove error for key {key}: {e}");
        } else {
            debug!("Store REMOVE for key: {key}");
        }
    }

    async fn clear(&self) {
        let keys: Vec<_> = self
            .partition
            .keys()
            .filter_map(|k| k.ok())
            .collect();
        for key in keys {
            let _ = self.partition.remove(key);
        }
        debug!("Store CLEAR");
    }
}
