use crate::error::{Result, WatchlistError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use watchlist_config::StorageConfig;

/// Durable string-keyed storage the watchlist is mirrored into.
///
/// Values are opaque strings; the store owns the encoding.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-process storage; nothing survives the session
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory.
///
/// Writes go to a temp file that is renamed over the target, so a reader never
/// sees a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !StorageConfig::is_valid_key(key) {
            return Err(WatchlistError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            debug!("Storage miss: {} ({:?} does not exist)", key, path);
            return Ok(None);
        }
        let value = std::fs::read_to_string(&path)?;
        debug!("Storage hit: {} ({} bytes)", key, value.len());
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value)?;
        std::fs::rename(&temp_path, &path)?;
        debug!("Storage write: {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            std::fs::remove_file(&path)?;
            debug!("Storage remove: {}", key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_get_set_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("storage")).unwrap();

        assert_eq!(store.get("movie-app-watchlist").unwrap(), None);
        store.set("movie-app-watchlist", "[]").unwrap();
        assert_eq!(store.get("movie-app-watchlist").unwrap(), Some("[]".to_string()));
        assert!(dir.path().join("storage/movie-app-watchlist.json").exists());
        assert!(!dir.path().join("storage/movie-app-watchlist.json.tmp").exists());

        // A second handle on the same directory sees the value
        let reopened = FileStore::new(dir.path().join("storage")).unwrap();
        assert_eq!(reopened.get("movie-app-watchlist").unwrap(), Some("[]".to_string()));

        store.remove("movie-app-watchlist").unwrap();
        assert_eq!(store.get("movie-app-watchlist").unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();

        assert!(matches!(store.get("../outside"), Err(WatchlistError::InvalidKey(_))));
        assert!(matches!(store.set(".hidden", "x"), Err(WatchlistError::InvalidKey(_))));
        assert!(matches!(store.remove(""), Err(WatchlistError::InvalidKey(_))));
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
    }
}
