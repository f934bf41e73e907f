//! Versioned snapshots and the stores that keep them.
//!
//! Each state container persists an explicit subset of its fields as a
//! [`Snapshot`]: a key, a schema version, a timestamp, a checksum and a JSON
//! payload. On load the payload is run through the container's forward
//! migrations before it is decoded into the current shape.

pub mod checksum;
pub mod file;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

pub use checksum::calculate_checksum;
pub use file::FileStore;
pub use memory::MemoryStore;

/// A value that can be written to and restored from a [`Snapshot`].
pub trait Persisted: Sized {
    /// Storage key, unique per container.
    const KEY: &'static str;

    /// Current schema version written by [`Persisted::to_payload`].
    const VERSION: u32;

    fn to_payload(&self) -> StoreResult<Value>;

    /// Decode a payload written at `version` (never above `VERSION`),
    /// migrating it forward first when it is older.
    fn from_payload(version: u32, payload: Value) -> StoreResult<Self>;
}

/// Decode a JSON payload, reporting the path of the offending field on error.
pub fn decode_payload<T: DeserializeOwned>(payload: Value) -> StoreResult<T> {
    Ok(serde_path_to_error::deserialize(payload)?)
}

/// Versioned, checksummed envelope around a persisted payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub key: String,
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub checksum: String,
    pub payload: Value,
}

impl Snapshot {
    /// Wrap the current state of `value` at its current schema version.
    pub fn capture<T: Persisted>(value: &T) -> StoreResult<Self> {
        let payload = value.to_payload()?;
        Ok(Self {
            key: T::KEY.to_string(),
            version: T::VERSION,
            saved_at: Utc::now(),
            checksum: calculate_checksum(&payload)?,
            payload,
        })
    }

    /// Whether the stored checksum matches the payload.
    pub fn verify(&self) -> StoreResult<()> {
        let actual = calculate_checksum(&self.payload)?;
        if actual != self.checksum {
            return Err(StoreError::ChecksumMismatch {
                key: self.key.clone(),
                expected: self.checksum.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Unwrap into `T`, running its migrations when the snapshot is older.
    pub fn restore<T: Persisted>(self, verify_checksum: bool) -> StoreResult<T> {
        if self.key != T::KEY {
            return Err(StoreError::KeyMismatch {
                expected: T::KEY.to_string(),
                found: self.key,
            });
        }

        if verify_checksum {
            self.verify()?;
        }

        if self.version > T::VERSION {
            return Err(StoreError::UnsupportedVersion {
                key: self.key,
                found: self.version,
                latest: T::VERSION,
            });
        }

        if self.version < T::VERSION {
            log::warn!(
                "Migrating '{}' snapshot from version {} to {}",
                self.key,
                self.version,
                T::VERSION
            );
        }

        T::from_payload(self.version, self.payload)
    }
}

/// Key-value storage for snapshots.
///
/// Implementations are synchronous; saving is fire-and-forget from the
/// containers' point of view.
pub trait SnapshotStore {
    /// Return the snapshot stored under `key`, if any.
    fn load(&self, key: &str) -> StoreResult<Option<Snapshot>>;

    /// Store `snapshot` under its own key, replacing any previous one.
    fn save(&self, snapshot: &Snapshot) -> StoreResult<()>;

    /// Remove the snapshot under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Keys currently stored, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// Capture `value` and save it to `store`.
pub fn save<T: Persisted>(store: &dyn SnapshotStore, value: &T) -> StoreResult<()> {
    let snapshot = Snapshot::capture(value)?;
    store.save(&snapshot)?;
    log::info!("Saved '{}' snapshot (version {})", T::KEY, T::VERSION);
    Ok(())
}

/// Load and restore `T` from `store`; `Ok(None)` when nothing was saved yet.
pub fn load<T: Persisted>(store: &dyn SnapshotStore, verify_checksum: bool) -> StoreResult<Option<T>> {
    match store.load(T::KEY)? {
        Some(snapshot) => {
            let value = snapshot.restore(verify_checksum)?;
            log::info!("Loaded '{}' snapshot", T::KEY);
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
        label: String,
    }

    #[derive(Deserialize)]
    struct CounterV1 {
        count: u32,
    }

    impl Persisted for Counter {
        const KEY: &'static str = "counter";
        const VERSION: u32 = 2;

        fn to_payload(&self) -> StoreResult<Value> {
            Ok(serde_json::to_value(self)?)
        }

        fn from_payload(version: u32, payload: Value) -> StoreResult<Self> {
            if version == 1 {
                let old: CounterV1 = decode_payload(payload)?;
                return Ok(Counter {
                    count: old.count,
                    label: "untitled".to_string(),
                });
            }
            decode_payload(payload)
        }
    }

    fn counter() -> Counter {
        Counter {
            count: 7,
            label: "stars".to_string(),
        }
    }

    #[test]
    fn test_capture_and_restore() {
        let snapshot = Snapshot::capture(&counter()).unwrap();
        assert_eq!(snapshot.key, "counter");
        assert_eq!(snapshot.version, 2);
        snapshot.verify().unwrap();

        let restored: Counter = snapshot.restore(true).unwrap();
        assert_eq!(restored, counter());
    }

    #[test]
    fn test_older_version_is_migrated() {
        let payload = serde_json::json!({ "count": 3 });
        let snapshot = Snapshot {
            key: "counter".to_string(),
            version: 1,
            saved_at: Utc::now(),
            checksum: calculate_checksum(&payload).unwrap(),
            payload,
        };

        let restored: Counter = snapshot.restore(true).unwrap();
        assert_eq!(restored.count, 3);
        assert_eq!(restored.label, "untitled");
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut snapshot = Snapshot::capture(&counter()).unwrap();
        snapshot.version = 5;
        let err = snapshot.restore::<Counter>(true).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion { found: 5, latest: 2, .. }));
    }

    #[test]
    fn test_tampered_payload_fails_checksum() {
        let mut snapshot = Snapshot::capture(&counter()).unwrap();
        snapshot.payload["count"] = serde_json::json!(8);

        assert!(matches!(
            snapshot.clone().restore::<Counter>(true),
            Err(StoreError::ChecksumMismatch { .. })
        ));

        let unchecked: Counter = snapshot.restore(false).unwrap();
        assert_eq!(unchecked.count, 8);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let mut snapshot = Snapshot::capture(&counter()).unwrap();
        snapshot.key = "other".to_string();
        assert!(matches!(
            snapshot.restore::<Counter>(false),
            Err(StoreError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_payload_reports_path() {
        let payload = serde_json::json!({ "count": "many", "label": "x" });
        let snapshot = Snapshot {
            key: "counter".to_string(),
            version: 2,
            saved_at: Utc::now(),
            checksum: String::new(),
            payload,
        };
        match snapshot.restore::<Counter>(false) {
            Err(StoreError::Serialization { path, .. }) => assert_eq!(path, "count"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_save_and_load_helpers() {
        let store = MemoryStore::new();
        assert!(load::<Counter>(&store, true).unwrap().is_none());

        save(&store, &counter()).unwrap();
        let loaded = load::<Counter>(&store, true).unwrap();
        assert_eq!(loaded, Some(counter()));
    }
}
