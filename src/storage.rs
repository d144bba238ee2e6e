use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::StorageError;

/// Local key-value store holding serialized records as text
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage, with an optional per-value size limit to emulate a
/// full quota
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(limit),
        }
    }

    /// Seeds a raw value, bypassing the quota
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    limit,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            dir: AppDirs::settings_dir(),
        }
    }

    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn memory_roundtrip() {
        let mut store = MemoryStorage::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "{}").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn memory_quota_rejects_large_values() {
        let mut store = MemoryStorage::with_quota(4);
        assert!(store.set("a", "1234").is_ok());
        assert_matches!(
            store.set("a", "12345"),
            Err(StorageError::QuotaExceeded { needed: 5, limit: 4, .. })
        );
        assert_eq!(store.raw("a"), Some("1234"));
    }

    #[test]
    fn file_roundtrip_creates_directory() {
        let dir = tempdir().unwrap();
        let mut store = FileStorage::with_dir(dir.path().join("nested").join("triq"));
        assert_eq!(store.get("schulte-settings").unwrap(), None);

        store.set("schulte-settings", "{\"level\":\"hard\"}").unwrap();
        assert_eq!(
            store.get("schulte-settings").unwrap().as_deref(),
            Some("{\"level\":\"hard\"}")
        );
        assert!(store.dir().join("schulte-settings.json").exists());
    }

    #[test]
    fn file_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let mut store = FileStorage::with_dir(dir.path());
        assert_matches!(store.get("../etc"), Err(StorageError::InvalidKey(_)));
        assert_matches!(store.set("", "x"), Err(StorageError::InvalidKey(_)));
    }

    #[test]
    fn file_write_into_unwritable_location_fails() {
        let dir = tempdir().unwrap();
        // a regular file where the directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let mut store = FileStorage::with_dir(&blocker);
        assert_matches!(store.set("key", "v"), Err(StorageError::Io { .. }));
    }
}
