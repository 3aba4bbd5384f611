//! Persistence gateway for the saved play collection.
//!
//! The whole collection is written as one JSON array under a single key,
//! matching the web app's `localStorage["handballPlays"]`. Loading never fails:
//! missing data is an empty collection, and unreadable or malformed data is
//! logged and treated the same way.

use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use log::warn;

use crate::data::Play;

/// Storage key of the saved collection.
pub const PLAYS_KEY: &str = "handballPlays";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    #[error("IO error: {reason}")]
    Io { reason: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// Host storage refused the operation (quota, privacy mode, ...).
    #[error("storage backend error: {reason}")]
    Backend { reason: String },
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

/// Opaque string key-value storage (browser localStorage, files, memory).
pub trait KeyValueBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated backend, handy for seeding legacy data in tests.
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.into());
        Self { entries }
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory, created on first write.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        // Written beside the target and renamed into place.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Save/load contract for the ordered play collection.
pub trait PlayStore {
    /// Replace the stored collection with `plays`.
    fn save(&mut self, plays: &[Play]) -> Result<(), StoreError>;

    /// Stored collection in saved order; empty when missing or unreadable.
    fn load(&self) -> Vec<Play>;
}

#[derive(Debug, Clone)]
pub struct KeyValuePlayStore<B: KeyValueBackend> {
    backend: B,
    key: String,
}

impl<B: KeyValueBackend> KeyValuePlayStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, PLAYS_KEY)
    }

    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: KeyValueBackend> PlayStore for KeyValuePlayStore<B> {
    fn save(&mut self, plays: &[Play]) -> Result<(), StoreError> {
        let json = serde_json::to_string(plays)?;
        self.backend.set(&self.key, &json)
    }

    fn load(&self) -> Vec<Play> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("could not read saved plays '{}': {e}", self.key);
                return Vec::new();
            }
        };
        parse_play_collection(&raw)
    }
}

/// Decode a saved collection entry by entry, dropping entries that fail to
/// decode or validate. Only a malformed top-level array yields an empty list.
pub fn parse_play_collection(raw: &str) -> Vec<Play> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("saved plays are malformed, starting empty: {e}");
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let play: Play = match serde_json::from_value(entry) {
                Ok(play) => play,
                Err(e) => {
                    warn!("skipping undecodable saved play #{index}: {e}");
                    return None;
                }
            };
            match play.validate_basic() {
                Ok(()) => Some(play),
                Err(e) => {
                    warn!("skipping saved play '{}': {e}", play.id);
                    None
                }
            }
        })
        .collect()
}
