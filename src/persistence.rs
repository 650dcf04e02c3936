//! Registry persistence.
//!
//! The registry is written as one JSON document after every successful
//! mutation and read back once at startup. Storage backends implement
//! [`RegistryStore`] so the rules engine does not care where the document
//! lives.
//!
//! # Example
//!
//! ```ignore
//! use groupwise::persistence::{JsonFileStore, RegistryStore};
//!
//! let store = JsonFileStore::new("data.json");
//! let snapshot = store.load()?.unwrap_or_default();
//! store.save(&snapshot)?;
//! ```

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use groupwise_models::RegistrySnapshot;
use tracing::{debug, instrument};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed registry document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A place the registry document can be read from and written to.
pub trait RegistryStore: fmt::Debug {
    /// Reads the stored document.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<RegistrySnapshot>, StorageError>;

    /// Replaces the stored document with `snapshot`.
    fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), StorageError>;
}

/// JSON document on the local filesystem.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "registry".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RegistryStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Option<RegistrySnapshot>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No registry document yet");
                return Ok(None);
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        let snapshot: RegistrySnapshot = serde_json::from_slice(&bytes)?;
        debug!(
            students = snapshot.students.len(),
            groups = snapshot.groups.len(),
            "Registry document read"
        );
        Ok(Some(snapshot))
    }

    #[instrument(skip(self, snapshot), fields(path = %self.path.display()))]
    fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(snapshot)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let tmp = self.temp_path();
        let mut file = fs::File::create(&tmp).map_err(|e| StorageError::io(&tmp, e))?;
        file.write_all(&body)
            .and_then(|_| file.sync_all())
            .map_err(|e| StorageError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| StorageError::io(&self.path, e))?;
        debug!(bytes = body.len(), "Registry document written");
        Ok(())
    }
}

/// Keeps the last saved document in memory.
///
/// Clones share the same slot, so a test can hold one handle while the
/// engine writes through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<RegistrySnapshot>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: RegistrySnapshot) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(snapshot))),
        }
    }

    /// The last saved document, if any.
    pub fn last_saved(&self) -> Option<RegistrySnapshot> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl RegistryStore for MemoryStore {
    fn load(&self) -> Result<Option<RegistrySnapshot>, StorageError> {
        Ok(self.last_saved())
    }

    fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), StorageError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(snapshot.clone());
        }
        Ok(())
    }
}
