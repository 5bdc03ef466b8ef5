use crate::store::KeyValueCollection;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

/// Volatile collection backed by a HashMap. Used for tests and as the
/// fallback when the on-disk keyspace cannot be opened.
pub struct MemoryCollection {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueCollection for MemoryCollection {
    async fn get(&self, key: &str) -> Option<Value> {
        let store = self.inner.lock().await;
        if let Some(entry) = store.get(key) {
            if let Some(expiry) = entry.expires_at {
                if expiry < Instant::now() {
                    debug!("Store entry expired for key: {key}");
                    return None;
                }
            }
            debug!("Store HIT for key: {key}");
            return Some(entry.value.clone());
        }
        debug!("Store MISS for key: {key}");
        None
    }

    async fn put(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let expires_at = ttl.map(|duration| Instant::now() + duration);
        let mut store = self.inner.lock().await;
        debug!("Store PUT for key: {key}");
        store.insert(key.to_string(), Entry { value, expires_at });
    }

    async fn remove(&self, key: &str) {
        let mut store = self.inner.lock().await;
        store.remove(key);
        debug!("Store REMOVE for key: {key}");
    }

    async fn clear(&self) {
        let mut store = self.inner.lock().await;
        store.clear();
        debug!("Store CLEAR");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_memory_get_put() {
        let store = MemoryCollection::new();

        assert!(store.get("key1").await.is_none());

        store.put("key1", json!({"year": 2024}), None).await;
        assert_eq!(store.get("key1").await, Some(json!({"year": 2024})));

        assert!(store.get("key2").await.is_none());
    }

    #[tokio::test]
    async fn test_memory_ttl_expiration() {
        let store = MemoryCollection::new();

        store
            .put("key1", json!(123), Some(Duration::from_millis(10)))
            .await;
        assert_eq!(store.get("key1").await, Some(json!(123)));

        sleep(Duration::from_millis(20)).await;
        assert!(store.get("key1").await.is_none());
    }

    #[tokio::test]
    async fn test_memory_remove_and_clear() {
        let store = MemoryCollection::new();

        store.put("key1", json!(1), None).await;
        store.put("key2", json!(2), None).await;

        store.remove("key1").await;
        assert!(store.get("key1").await.is_none());
        assert_eq!(store.get("key2").await, Some(json!(2)));

        store.clear().await;
        assert!(store.get("key2").await.is_none());
    }
}
