//! File-backed snapshot store: one pretty-printed JSON file per key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Snapshot, SnapshotStore};
use crate::error::{StoreError, StoreResult};

const EXTENSION: &str = "json";

/// Snapshot store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store in `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::Internal(format!("Invalid snapshot key: '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, key: &str) -> StoreResult<Option<Snapshot>> {
        let path = self.path_for(key)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let de = &mut serde_json::Deserializer::from_str(&content);
        let snapshot: Snapshot = serde_path_to_error::deserialize(de)?;

        if snapshot.key != key {
            return Err(StoreError::KeyMismatch {
                expected: key.to_string(),
                found: snapshot.key,
            });
        }
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let path = self.path_for(&snapshot.key)?;
        let json = serde_json::to_string_pretty(snapshot)?;

        // The target file is only ever replaced whole.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        log::debug!("Wrote snapshot to {}", path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(key: &str) -> Snapshot {
        let payload = serde_json::json!({ "has_completed_setup": true });
        Snapshot {
            key: key.to_string(),
            version: 1,
            saved_at: Utc::now(),
            checksum: crate::persistence::calculate_checksum(&payload).unwrap(),
            payload,
        }
    }

    #[test]
    fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested/data")).unwrap();
        assert!(store.dir().exists());

        let original = snapshot("setup_wizard");
        store.save(&original).unwrap();

        let loaded = store.load("setup_wizard").unwrap().unwrap();
        assert_eq!(loaded, original);
        loaded.verify().unwrap();
        assert_eq!(store.keys().unwrap(), vec!["setup_wizard"]);
    }

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.load("settings").unwrap().is_none());
        store.remove("settings").unwrap();
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.load("../escape").is_err());
        assert!(store.load("").is_err());
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("tour.json"), "{ not json").unwrap();

        assert!(matches!(
            store.load("tour"),
            Err(StoreError::Serialization { .. })
        ));
    }

    #[test]
    fn test_renamed_file_is_key_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.save(&snapshot("tour")).unwrap();
        std::fs::rename(dir.path().join("tour.json"), dir.path().join("settings.json")).unwrap();

        assert!(matches!(
            store.load("settings"),
            Err(StoreError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn test_keys_ignore_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.save(&snapshot("equipment")).unwrap();
        store.save(&snapshot("settings")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["equipment", "settings"]);

        store.remove("equipment").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["settings"]);
    }
}
