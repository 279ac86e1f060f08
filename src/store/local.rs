//! Filesystem-backed byte store.
//!
//! Maps store keys directly onto paths under a root directory. This is the
//! backend used for local development; remote object-storage backends
//! implement the same trait elsewhere.

use crate::store::{ByteStore, StoreError};
use std::fs;
use std::path::PathBuf;

/// Byte store rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    /// Create a store rooted at the given directory (created lazily)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ByteStore for LocalDirStore {
    fn upload(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(())
    }

    fn download(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        if !self.root.exists() {
            return Ok(keys);
        }
        for entry in walkdir::WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let key = relative.to_string_lossy().replace('\\', "/");
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_upload_download_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LocalDirStore::new(dir.path());
        store.upload("ns/project/blob.json", b"{}").unwrap();
        assert_eq!(store.download("ns/project/blob.json").unwrap(), b"{}");
    }

    #[test]
    fn test_download_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = LocalDirStore::new(dir.path());
        assert!(matches!(
            store.download("ns/missing.json"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_by_prefix() {
        let dir = TempDir::new().unwrap();
        let store = LocalDirStore::new(dir.path());
        store.upload("ns/a/one.json", b"1").unwrap();
        store.upload("ns/a/two.json", b"2").unwrap();
        store.upload("ns/b/three.json", b"3").unwrap();

        let keys = store.list("ns/a/").unwrap();
        assert_eq!(keys, vec!["ns/a/one.json", "ns/a/two.json"]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = LocalDirStore::new(dir.path());
        store.upload("ns/x.json", b"x").unwrap();
        store.delete("ns/x.json").unwrap();
        store.delete("ns/x.json").unwrap();
        assert!(store.list("ns/").unwrap().is_empty());
    }
}
