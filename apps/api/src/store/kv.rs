//! Key-value store trait and the two implementations the service ships.
//!
//! The form store only needs string values under string keys, so any local
//! storage mechanism can stand behind this trait.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid key '{0}'")]
    InvalidKey(String),
}

/// Durable string storage addressed by key.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Upsert.
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// No-op if the key does not exist.
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// One file per key inside a data directory.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so a
    /// crash mid-write never leaves a truncated blob behind. Each call gets its
    /// own temp file; concurrent writers race only on the rename.
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(io_error(&self.dir))?;

        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = tokio::fs::write(&tmp, value.as_bytes()).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error(&tmp)(e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error(&path)(e));
        }

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}

/// In-memory map. Used in tests and when no data directory is wanted.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
    writes: std::sync::atomic::AtomicUsize,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.writes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(dir.path().join("data"));

        assert_eq!(store.get("form").await.unwrap(), None);
        store.set("form", "{\"a\":1}").await.unwrap();
        assert_eq!(store.get("form").await.unwrap().as_deref(), Some("{\"a\":1}"));

        store.set("form", "{\"a\":2}").await.unwrap();
        assert_eq!(store.get("form").await.unwrap().as_deref(), Some("{\"a\":2}"));
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("data"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("form.json")]);

        store.remove("form").await.unwrap();
        assert_eq!(store.get("form").await.unwrap(), None);
        store.remove("form").await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_one_key_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FileKvStore::new(dir.path()));

        for round in 0..50 {
            let a = store.clone();
            let b = store.clone();
            let first = format!("{{\"round\":{round},\"writer\":\"a\"}}");
            let second = format!("{{\"round\":{round},\"writer\":\"b\"}}");
            let (ra, rb) = tokio::join!(
                tokio::spawn({
                    let first = first.clone();
                    async move { a.set("form", &first).await }
                }),
                tokio::spawn({
                    let second = second.clone();
                    async move { b.set("form", &second).await }
                }),
            );
            ra.unwrap().unwrap();
            rb.unwrap().unwrap();

            let stored = store.get("form").await.unwrap().unwrap();
            assert!(stored == first || stored == second, "torn value {stored}");
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(dir.path());
        let err = store.set("../escape", "x").await.unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_memory_store_counts_writes() {
        let store = MemoryKvStore::new();
        store.set("k", "1").await.unwrap();
        store.set("k", "2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.write_count(), 2);
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
