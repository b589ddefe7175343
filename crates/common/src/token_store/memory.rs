use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use super::provider::TokenStore;
use super::slot::TokenSlot;

/// In-memory token store backed by a sorted map
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<RwLock<BTreeMap<TokenSlot, String>>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryTokenStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    type Error = MemoryTokenStoreError;

    async fn get(&self, slot: &TokenSlot) -> Result<Option<String>, Self::Error> {
        let inner = self.inner.read().map_err(|e| {
            MemoryTokenStoreError::Internal(format!("failed to acquire read lock: {}", e))
        })?;

        Ok(inner.get(slot).cloned())
    }

    async fn put(&self, slot: &TokenSlot, value: String) -> Result<(), Self::Error> {
        let mut inner = self.inner.write().map_err(|e| {
            MemoryTokenStoreError::Internal(format!("failed to acquire write lock: {}", e))
        })?;

        inner.insert(slot.clone(), value);
        Ok(())
    }

    async fn delete(&self, slot: &TokenSlot) -> Result<bool, Self::Error> {
        let mut inner = self.inner.write().map_err(|e| {
            MemoryTokenStoreError::Internal(format!("failed to acquire write lock: {}", e))
        })?;

        Ok(inner.remove(slot).is_some())
    }

    async fn slots(&self) -> Result<Vec<TokenSlot>, Self::Error> {
        let inner = self.inner.read().map_err(|e| {
            MemoryTokenStoreError::Internal(format!("failed to acquire read lock: {}", e))
        })?;

        Ok(inner.keys().cloned().collect())
    }
}
