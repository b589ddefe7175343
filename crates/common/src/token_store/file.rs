use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use super::provider::TokenStore;
use super::slot::{TokenSlot, TokenSlotError};

/// Token store persisted as a single JSON object on disk.
///
/// Every write rewrites the whole file through a uniquely named temporary
/// sibling and a rename, so readers never observe a half-written file. A
/// missing file reads as an empty store.
///
/// Writers are serialised within one process only. Two processes updating
/// the same file concurrently can lose an update; run a single writer.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    // serialises read-modify-write cycles within this process
    lock: Arc<Mutex<()>>,
}

#[derive(thiserror::Error, Debug)]
pub enum FileTokenStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("corrupt token file entry: {0}")]
    InvalidSlot(#[from] TokenSlotError),
}

type Entries = BTreeMap<TokenSlot, String>;

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, FileTokenStoreError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }

        let raw: BTreeMap<String, String> = serde_json::from_slice(&data)?;
        let mut entries = Entries::new();
        for (key, value) in raw {
            entries.insert(key.parse()?, value);
        }
        Ok(entries)
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), FileTokenStoreError> {
        let raw: BTreeMap<String, &String> = entries
            .iter()
            .map(|(slot, value)| (slot.to_string(), value))
            .collect();
        let data = serde_json::to_vec_pretty(&raw)?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&parent).await?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&parent)?;
            tmp.write_all(&data)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)??;

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            "token file written"
        );
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    type Error = FileTokenStoreError;

    async fn get(&self, slot: &TokenSlot) -> Result<Option<String>, Self::Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(slot))
    }

    async fn put(&self, slot: &TokenSlot, value: String) -> Result<(), Self::Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(slot.clone(), value);
        self.write_entries(&entries).await
    }

    async fn delete(&self, slot: &TokenSlot) -> Result<bool, Self::Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(slot).is_none() {
            return Ok(false);
        }
        self.write_entries(&entries).await?;
        Ok(true)
    }

    async fn slots(&self) -> Result<Vec<TokenSlot>, Self::Error> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.into_keys().collect())
    }
}
