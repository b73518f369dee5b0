use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::error::{InterviewError, InterviewResult};

/// String-keyed JSON value store, optionally mirrored to a single JSON
/// document on disk.
///
/// Every write replaces whole values and rewrites the document under the
/// write lock, so concurrent writers resolve last-write-wins per key. The
/// in-memory map only changes once the document has been written.
#[derive(Clone)]
pub struct KvStore {
    path: Option<PathBuf>,
    entries: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl KvStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Open (or lazily create) the document at `path`
    pub async fn open(path: impl AsRef<Path>) -> InterviewResult<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Opened store {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path: Some(path),
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> InterviewResult<Option<T>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> InterviewResult<()> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.entries.write().await;

        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.persist(&next).await?;

        *entries = next;
        Ok(())
    }

    /// Returns whether the key existed
    pub async fn remove(&self, key: &str) -> InterviewResult<bool> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(false);
        }

        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next).await?;

        *entries = next;
        Ok(true)
    }

    /// Read-modify-write a single key atomically with respect to other writers.
    /// A missing key starts from `T::default()`.
    pub async fn update<T, R, F>(&self, key: &str, f: F) -> InterviewResult<R>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> R,
    {
        let mut entries = self.entries.write().await;

        let mut value: T = match entries.get(key) {
            Some(value) => serde_json::from_value(value.clone())?,
            None => T::default(),
        };

        let result = f(&mut value);

        let mut next = entries.clone();
        next.insert(key.to_string(), serde_json::to_value(&value)?);
        self.persist(&next).await?;

        *entries = next;
        Ok(result)
    }

    pub async fn keys(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    async fn persist(&self, entries: &BTreeMap<String, Value>) -> InterviewResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(entries)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("json.tmp");
        let result = async {
            tokio::fs::write(&tmp, &bytes).await?;
            tokio::fs::rename(&tmp, path).await
        }
        .await;

        result.map_err(|e| {
            error!("Failed to write store {}: {}", path.display(), e);
            InterviewError::Storage(format!("{}: {}", path.display(), e))
        })
    }
}
