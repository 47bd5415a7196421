//! Key-value persistence for the session
//!
//! The session keeps two keys: [`USER_KEY`] holds the serialized user and
//! [`TOKEN_KEY`] the bearer token when the backend issued one. Both change
//! together through [`KeyValueStore::write_all`].
//!
//! - [`MemoryStore`]: process-local, for tests and one-shot runs
//! - [`FileStore`]: a JSON object on disk that survives restarts

use crate::error::StoreError;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Key of the persisted user record
pub const USER_KEY: &str = "user";

/// Key of the persisted bearer token
pub const TOKEN_KEY: &str = "token";

/// One write in a [`KeyValueStore::write_all`] batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Insert or replace a key
    Set { key: String, value: String },
    /// Remove a key if present
    Remove(String),
}

impl Change {
    #[inline]
    #[must_use]
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove(key.into())
    }

    /// Key this change touches
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Remove(key) => key,
        }
    }

    fn apply(&self, entries: &mut BTreeMap<String, String>) {
        match self {
            Self::Set { key, value } => {
                entries.insert(key.clone(), value.clone());
            }
            Self::Remove(key) => {
                entries.remove(key);
            }
        }
    }
}

/// String key-value store that outlives the process
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Value under `key`, if any
    ///
    /// # Errors
    /// The backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Apply every change or none of them
    ///
    /// # Errors
    /// The backing storage cannot be written; nothing was applied.
    fn write_all(&self, changes: &[Change]) -> Result<(), StoreError>;

    /// Insert or replace `key`
    ///
    /// # Errors
    /// The backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.write_all(&[Change::set(key, value)])
    }

    /// Remove `key`; removing a missing key is not an error
    ///
    /// # Errors
    /// The backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.write_all(&[Change::remove(key)])
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write_all(&self, changes: &[Change]) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        for change in changes {
            change.apply(&mut entries);
        }
        Ok(())
    }
}

/// Store backed by a single JSON file
///
/// Every write rewrites the whole file through a temporary sibling that is
/// renamed into place, so readers never observe a half-written file. A file
/// that no longer parses is reported by [`KeyValueStore::get`] and replaced
/// by the next write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Store at `path`; the file and its directory are created on first write
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let encoded = serde_json::to_vec_pretty(entries).map_err(StoreError::Encode)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(&encoded).map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    fn update(&self, changes: &[Change]) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(StoreError::Corrupt { path, source }) => {
                tracing::warn!("Discarding corrupt session file {}: {}", path.display(), source);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        for change in changes {
            change.apply(&mut entries);
        }
        self.save(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn write_all(&self, changes: &[Change]) -> Result<(), StoreError> {
        self.update(changes)
    }
}
