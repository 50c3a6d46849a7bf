//! Key/value storage port.
//!
//! Everything almanac persists goes through [`Storage`]: the event blob, the
//! theme preference, the synced-years list and the CLI view state. The store
//! and the resolver never touch the filesystem directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AlmanacError, AlmanacResult};

pub trait Storage {
    /// Read the raw value stored under `key`, `None` if it was never written.
    fn get(&self, key: &str) -> AlmanacResult<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> AlmanacResult<()>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, key: &str) -> AlmanacResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> AlmanacResult<()> {
        (**self).set(key, value)
    }
}

/// In-memory storage, used by tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> AlmanacResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> AlmanacResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by one `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> AlmanacResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !valid {
            return Err(AlmanacError::Storage(format!("Invalid storage key '{}'", key)));
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> AlmanacResult<Option<String>> {
        let path = self.path_for(key)?;

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> AlmanacResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(path, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("theme").unwrap(), None);

        storage.set("theme", "light").unwrap();
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn file_storage_creates_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(tmp.path().join("nested"));

        assert_eq!(storage.get("calendar_theme").unwrap(), None);
        storage.set("calendar_theme", "dark").unwrap();

        assert!(tmp.path().join("nested/calendar_theme.json").exists());
        assert_eq!(storage.get("calendar_theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(tmp.path());

        assert!(storage.set("../escape", "x").is_err());
        assert!(storage.get("").is_err());
    }

    #[test]
    fn mutable_reference_is_a_storage() {
        fn write_through(mut storage: impl Storage) {
            storage.set("k", "v").unwrap();
        }

        let mut storage = MemoryStorage::new();
        write_through(&mut storage);
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }
}
