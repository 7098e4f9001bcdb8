//! Key/value storage behind the session.
//!
//! Values are strings, the way a browser-style store holds them. A batch write is
//! one logical unit: the file store writes the whole map to a sibling temp file and
//! renames it over the save, so an interrupted write leaves the previous save intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode storage: {0}")]
    Encode(#[from] ron::Error),
    #[error("could not encode star list: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Write every entry or none of them.
    fn write_batch(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.write_batch(&[(key, value)])
    }
}

/// In-memory store, used by tests and as a fallback.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write_batch(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        for (k, v) in entries {
            self.entries.insert((*k).to_string(), v.clone());
        }
        Ok(())
    }
}

/// Store backed by a single RON map file.
#[derive(Debug)]
pub struct RonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl RonFileStore {
    /// Open `path`. A missing file is an empty store; an unreadable RON file is
    /// logged and treated as empty so startup never fails on bad saved state.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(s) => match ron::from_str(&s) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Ignoring unreadable save at {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        log::info!("Opened save {:?} ({} keys)", path, entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file each batch is staged in before the rename.
    pub fn staging_path(&self) -> PathBuf {
        self.path.with_extension("ron.tmp")
    }
}

impl KeyValueStore for RonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write_batch(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        for (k, v) in entries {
            next.insert((*k).to_string(), v.clone());
        }
        let s = ron::ser::to_string_pretty(&next, ron::ser::PrettyConfig::default())?;
        let staging = self.staging_path();
        std::fs::write(&staging, s).map_err(|source| StoreError::Io {
            path: staging.clone(),
            source,
        })?;
        if let Err(source) = std::fs::rename(&staging, &self.path) {
            let _ = std::fs::remove_file(&staging);
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }
        self.entries = next;
        Ok(())
    }
}
