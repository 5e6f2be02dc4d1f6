//! JSON-file backed store.
//!
//! The file is re-read on every `get`, so a token written by another process
//! (for example a separate login tool) is picked up by the next request.

use super::KeyValueStore;
use crate::error::GatewayError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // serializes read-modify-write cycles from this process
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, GatewayError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), GatewayError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    // sibling of the target, never the target itself
    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn modify(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), GatewayError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        f(&mut entries);
        self.persist(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!(target: "console_core::storage", path=%self.path.display(), err=%e, "failed to read store");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GatewayError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), GatewayError> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        assert_eq!(store.get("token"), None);
    }

    #[test]
    fn values_survive_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/storage.json");

        FileStore::new(&path).set("token", "abc").unwrap();
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("token").as_deref(), Some("abc"));

        reopened.remove("token").unwrap();
        assert_eq!(FileStore::new(&path).get("token"), None);
    }

    #[test]
    fn store_named_tmp_writes_through_a_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.tmp");

        let store = FileStore::new(&path);
        assert_eq!(store.temp_path(), dir.path().join("session.tmp.tmp"));

        store.set("token", "abc").unwrap();
        store.set("tenant", "7").unwrap();
        assert_eq!(FileStore::new(&path).get("token").as_deref(), Some("abc"));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn corrupt_file_reads_as_missing_but_fails_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("token"), None);
        assert!(matches!(
            store.set("token", "abc"),
            Err(GatewayError::JsonError(_))
        ));
    }
}
