use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use brief_core::{RecordStore, Result};
use tokio::sync::RwLock;

/// Volatile store, used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.records.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn write_atomic(&self, key: &str, contents: &str) -> Result<()> {
        self.records
            .write()
            .await
            .insert(key.to_string(), contents.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.records.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, dir: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        Ok(self
            .records
            .read()
            .await
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|name| !name.contains('/'))
            .map(str::to_string)
            .collect())
    }
}
