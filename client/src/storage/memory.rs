//! In-memory session store.
//!
//! Starts empty and is dropped with the process. Used by tests and by the
//! binary when no `SESSION_STORE_PATH` is configured.

use super::SessionStorage;
use crate::errors::ClientResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TOKEN_KEY;

    #[tokio::test]
    async fn test_basic_operations() {
        let storage = MemoryStorage::new();

        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);

        storage.set(TOKEN_KEY, "t1").await.unwrap();
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("t1"));

        storage.set(TOKEN_KEY, "t2").await.unwrap();
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("t2"));

        storage.remove(TOKEN_KEY).await.unwrap();
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);

        // Removing again is fine
        storage.remove(TOKEN_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("user", "{}").await.unwrap();
        assert_eq!(other.get("user").await.unwrap().as_deref(), Some("{}"));
    }
}
