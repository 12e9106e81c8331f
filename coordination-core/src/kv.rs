//! Hierarchical key-value store.
//!
//! Keys form a `/`-separated hierarchy over an ordered map, which makes
//! directory listing and directory deletion cheap range scans. Readers of
//! absent keys park on a one-shot channel that the next insert fires.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use tokio::sync::oneshot;

use crate::error::{CoordinationError, Result};

/// Normalizes a key: strips leading/trailing slashes and collapses runs of
/// slashes, e.g. `///a//b/c//` becomes `a/b/c`.
pub fn normalize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueEntry {
    pub key: String,
    pub value: String,
}

/// Outcome of a potentially-blocking get.
pub enum KeyValueGet {
    /// The key was present (or the store has shut down); the result is
    /// available immediately.
    Ready(Result<String>),
    /// The key is absent; the receiver fires on the next insert, or with
    /// `Cancelled` at service shutdown.
    Pending(oneshot::Receiver<Result<String>>),
}

#[derive(Default)]
pub struct KeyValueStore {
    entries: BTreeMap<String, String>,
    pending: HashMap<String, Vec<oneshot::Sender<Result<String>>>>,
    shut_down: bool,
}

impl KeyValueStore {
    /// Inserts a key-value pair. Fails if the key exists and overwriting is
    /// not allowed; on success every reader parked on the key is released.
    pub fn insert(&mut self, key: &str, value: &str, allow_overwrite: bool) -> Result<()> {
        let norm_key = normalize_key(key);
        if !allow_overwrite && self.entries.contains_key(&norm_key) {
            return Err(CoordinationError::already_exists(format!(
                "config key {key} already exists"
            )));
        }
        self.entries.insert(norm_key.clone(), value.to_string());
        if let Some(waiters) = self.pending.remove(&norm_key) {
            for waiter in waiters {
                let _ = waiter.send(Ok(value.to_string()));
            }
        }
        Ok(())
    }

    /// Returns the value if present, otherwise parks the caller until a
    /// matching insert or service shutdown.
    pub fn get(&mut self, key: &str) -> KeyValueGet {
        let norm_key = normalize_key(key);
        if let Some(value) = self.entries.get(&norm_key) {
            return KeyValueGet::Ready(Ok(value.clone()));
        }
        if self.shut_down {
            return KeyValueGet::Ready(Err(CoordinationError::cancelled(format!(
                "coordination service is shutting down, cancelling GetKeyValue for key: {key}"
            ))));
        }
        let (tx, rx) = oneshot::channel();
        self.pending.entry(norm_key).or_default().push(tx);
        KeyValueGet::Pending(rx)
    }

    pub fn try_get(&self, key: &str) -> Result<String> {
        let norm_key = normalize_key(key);
        self.entries
            .get(&norm_key)
            .cloned()
            .ok_or_else(|| CoordinationError::not_found(format!("config key {key} not found")))
    }

    /// Returns every entry under `directory_key + "/"`, in key order.
    pub fn dir(&self, directory_key: &str) -> Vec<KeyValueEntry> {
        let dir = format!("{}/", normalize_key(directory_key));
        self.entries
            .range::<String, _>((Bound::Included(&dir), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(&dir))
            .map(|(key, value)| KeyValueEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }

    /// Removes the key and every key under it. Always succeeds.
    pub fn delete(&mut self, key: &str) {
        let norm_key = normalize_key(key);
        let dir = format!("{norm_key}/");
        let descendants: Vec<String> = self
            .entries
            .range::<String, _>((Bound::Included(&dir), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(&dir))
            .map(|(key, _)| key.clone())
            .collect();
        for key in descendants {
            self.entries.remove(&key);
        }
        self.entries.remove(&norm_key);
    }

    /// Releases every parked reader with `Cancelled` and stops accepting new
    /// blocking gets. Called at shutdown.
    pub fn cancel_pending(&mut self) {
        self.shut_down = true;
        for (key, waiters) in self.pending.drain() {
            for waiter in waiters {
                let _ = waiter.send(Err(CoordinationError::cancelled(format!(
                    "coordination service is shutting down, cancelling GetKeyValue for key: {key}"
                ))));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_and_trims_slashes() {
        assert_eq!(normalize_key("///a//b/c//"), "a/b/c");
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key("/"), "");
        assert_eq!(normalize_key("a/b"), "a/b");
    }

    #[test]
    fn normalize_is_idempotent() {
        for key in ["///a//b/c//", "", "a", "/x/y/"] {
            let once = normalize_key(key);
            assert_eq!(normalize_key(&once), once);
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let mut store = KeyValueStore::default();
        store.insert("a/b", "1", false).unwrap();
        assert_eq!(store.try_get("a/b").unwrap(), "1");
        assert_eq!(store.try_get("/a//b").unwrap(), "1");

        let err = store.insert("a/b", "2", false).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::AlreadyExists);

        store.insert("a/b", "2", true).unwrap();
        assert_eq!(store.try_get("a/b").unwrap(), "2");
    }

    #[test]
    fn try_get_missing_key_is_not_found() {
        let store = KeyValueStore::default();
        let err = store.try_get("nope").unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::NotFound);
    }

    #[test]
    fn dir_matches_prefix_but_not_siblings() {
        let mut store = KeyValueStore::default();
        store.insert("a", "root", false).unwrap();
        store.insert("a/b", "1", false).unwrap();
        store.insert("a/c/d", "2", false).unwrap();
        store.insert("ab", "sibling", false).unwrap();

        let entries = store.dir("a");
        assert_eq!(
            entries,
            vec![
                KeyValueEntry {
                    key: "a/b".into(),
                    value: "1".into()
                },
                KeyValueEntry {
                    key: "a/c/d".into(),
                    value: "2".into()
                },
            ]
        );
    }

    #[test]
    fn delete_removes_key_and_descendants_only() {
        let mut store = KeyValueStore::default();
        store.insert("a", "root", false).unwrap();
        store.insert("a/b", "1", false).unwrap();
        store.insert("a/b/c", "2", false).unwrap();
        store.insert("ab", "sibling", false).unwrap();

        store.delete("a");
        assert!(store.try_get("a").is_err());
        assert!(store.try_get("a/b").is_err());
        assert!(store.try_get("a/b/c").is_err());
        assert_eq!(store.try_get("ab").unwrap(), "sibling");
    }

    #[tokio::test]
    async fn pending_get_fires_on_insert() {
        let mut store = KeyValueStore::default();
        let KeyValueGet::Pending(rx) = store.get("a/b") else {
            panic!("expected a pending get");
        };
        store.insert("/a//b", "1", false).unwrap();
        assert_eq!(rx.await.unwrap().unwrap(), "1");
    }

    #[tokio::test]
    async fn cancel_pending_fires_cancelled() {
        let mut store = KeyValueStore::default();
        let KeyValueGet::Pending(rx) = store.get("missing") else {
            panic!("expected a pending get");
        };
        store.cancel_pending();
        let err = rx.await.unwrap().unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::Cancelled);
    }
}
