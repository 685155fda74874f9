//! Session-scoped key/value storage
//!
//! The exhibition depends on [`SessionStore`] only, so the backend can be
//! swapped per deployment: [`MemoryStore`] lives as long as the process,
//! [`FileStore`] keeps one JSON file per key in a directory.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::config::{StorageBackend, StorageConfig};
use crate::{Error, Result};

/// Minimal key/value persistence port
pub trait SessionStore: Send + Sync {
    /// Stored value for `key`, or `None` if nothing was stored
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key succeeds
    fn clear(&self, key: &str) -> Result<()>;
}

/// In-process store; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| Error::Persistence(format!("memory store lock poisoned: {}", e)))
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Directory-backed store, one `<key>.json` file per key
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write never leaves a truncated value behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if missing) the storage directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::InvalidInput(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Persistence(format!("read {}: {}", path.display(), e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, value)
            .map_err(|e| Error::Persistence(format!("write {}: {}", temp_path.display(), e)))?;
        fs::rename(&temp_path, &path)
            .map_err(|e| Error::Persistence(format!("rename to {}: {}", path.display(), e)))?;

        debug!(key = key, bytes = value.len(), "Session entry written");
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Persistence(format!("remove {}: {}", path.display(), e))),
        }
    }
}

/// Build the configured storage backend
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn SessionStore>> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Session storage: in-memory (cleared when the process exits)");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::File => {
            let dir = config.resolved_directory()?;
            info!("Session storage: {}", dir.display());
            Ok(Arc::new(FileStore::open(dir)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_get_set_clear() {
        let store = MemoryStore::new();
        assert_eq!(store.get("exhibition-items").unwrap(), None);

        store.set("exhibition-items", "[]").unwrap();
        assert_eq!(store.get("exhibition-items").unwrap().as_deref(), Some("[]"));

        store.clear("exhibition-items").unwrap();
        assert_eq!(store.get("exhibition-items").unwrap(), None);
        store.clear("exhibition-items").unwrap();
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        let store = FileStore::open(temp_dir.path()).unwrap();
        store.set("exhibition-items", r#"{"version":1,"items":[]}"#).unwrap();

        let reopened = FileStore::open(temp_dir.path()).unwrap();
        assert_eq!(
            reopened.get("exhibition-items").unwrap().as_deref(),
            Some(r#"{"version":1,"items":[]}"#)
        );
        assert!(temp_dir.path().join("exhibition-items.json").exists());
        assert!(!temp_dir.path().join("exhibition-items.json.tmp").exists());
    }

    #[test]
    fn test_file_store_clear_missing_key_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path().join("nested")).unwrap();

        store.clear("exhibition-items").unwrap();
        assert_eq!(store.get("exhibition-items").unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        assert!(matches!(store.set("../escape", "x"), Err(Error::InvalidInput(_))));
        assert!(matches!(store.get(""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_open_store_file_backend() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::File,
            directory: Some(temp_dir.path().join("sessions")),
            ephemeral: false,
        };

        let store = open_store(&config).unwrap();
        store.set("k", "v").unwrap();
        assert!(temp_dir.path().join("sessions").join("k.json").exists());
    }
}
