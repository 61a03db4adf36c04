use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("storage io error at {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Device-local string-keyed storage for serialized JSON values.
pub trait KeyValueStore: Send + 'static {
    /// The stored value, or `None` if the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl KeyValueStore for Box<dyn KeyValueStore> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid { Ok(()) } else { Err(StorageError::InvalidKey(key.to_string())) }
}

// ---------------------------------------------------------------------------
// File-backed store: one `<key>.json` file per key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|source| StorageError::Io { path: self.dir.clone(), source })?;

        // Write-then-rename so a crash mid-write never leaves half a JSON document.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|source| StorageError::Io { path: tmp.clone(), source })?;
        std::fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }
}

// ---------------------------------------------------------------------------
// In-memory store. Clones share the same map, so a test can keep one handle
// while the persistence task owns another.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sportszone-storage-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn file_store_round_trips_and_reports_absent_keys() {
        let dir = scratch_dir("roundtrip");
        let mut store = FileStore::new(&dir);

        assert_eq!(store.get("favorites").unwrap(), None);
        store.set("favorites", "[]").unwrap();
        store.set("isDarkMode", "true").unwrap();
        assert_eq!(store.get("favorites").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("isDarkMode").unwrap().as_deref(), Some("true"));

        store.set("isDarkMode", "false").unwrap();
        assert_eq!(store.get("isDarkMode").unwrap().as_deref(), Some("false"));
        assert!(dir.join("isDarkMode.json").exists());
        assert!(!dir.join("isDarkMode.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let mut store = FileStore::new(scratch_dir("escape"));
        assert!(matches!(store.get("../etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.set("", "x"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn file_store_write_fails_when_dir_is_a_file() {
        let dir = scratch_dir("blocked");
        std::fs::write(&dir, "not a directory").unwrap();
        let mut store = FileStore::new(&dir);
        assert!(matches!(store.set("favorites", "[]"), Err(StorageError::Io { .. })));
        let _ = std::fs::remove_file(&dir);
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let shared = MemoryStore::new();
        let mut writer = shared.clone();
        writer.set("favorites", "[1]").unwrap();
        assert_eq!(shared.get("favorites").unwrap().as_deref(), Some("[1]"));
    }
}
