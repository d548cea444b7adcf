use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use skiff_core::consent::{SettingsError, SettingsStore};

/// In-memory settings store for ephemeral profiles and tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.entries.read().get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryStore::new();
        store.set("skiff:metricsOptIn", "agreed");
        assert_eq!(
            store.get("skiff:metricsOptIn").await.unwrap().as_deref(),
            Some("agreed")
        );
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("skiff:metricsOptIn").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_clears_value() {
        let store = MemoryStore::new();
        store.set("skiff:theme", "dark");
        store.remove("skiff:theme");
        assert!(store.get("skiff:theme").await.unwrap().is_none());
    }
}
