//! Directory-backed store: one `<key>.json` file per key.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, validate_key};
use crate::error::{PersistenceError, Result};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Io {
                operation: "read",
                path,
                source: e,
            }),
        }
    }

    /// Write through a temp file and rename it over the target.
    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: self.dir.clone(),
            source: e,
        })?;

        let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(value.as_bytes())
            .map_err(|e| PersistenceError::Io {
                operation: "write",
                path: temp_path.clone(),
                source: e,
            })?;
        file.sync_all().map_err(|e| PersistenceError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, &path).map_err(|e| PersistenceError::Io {
            operation: "rename",
            path: temp_path.clone(),
            source: e,
        })?;

        tracing::debug!(key, path = %path.display(), bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::Io {
                operation: "remove",
                path,
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn put_get_remove() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("data"));

        assert_eq!(store.get("importHistory").unwrap(), None);
        store.put("importHistory", "[]").unwrap();
        assert_eq!(store.get("importHistory").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data/importHistory.json").exists());
        assert!(!dir.path().join("data/importHistory.json.tmp").exists());

        store.put("importHistory", "[1]").unwrap();
        assert_eq!(store.get("importHistory").unwrap().as_deref(), Some("[1]"));

        store.remove("importHistory").unwrap();
        store.remove("importHistory").unwrap();
        assert_eq!(store.get("importHistory").unwrap(), None);
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(matches!(
            store.put("../outside", "x"),
            Err(PersistenceError::InvalidKey(_))
        ));
    }
}
