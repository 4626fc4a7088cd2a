//! JSON file note backend.
//!
//! Fallback store for when the database cannot be opened. The whole
//! map lives in memory and the file is rewritten on every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::NoteBackend;

/// One stored note with its last-modified time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct NoteEntry {
    body: String,
    updated_at: DateTime<Utc>,
}

/// Note storage backed by a single JSON file.
#[derive(Debug)]
pub struct FileNotes {
    /// Path to the backing file.
    path: PathBuf,
    /// In-memory copy of the file contents.
    entries: BTreeMap<String, NoteEntry>,
}

impl FileNotes {
    /// Opens the backend, loading any existing file.
    ///
    /// A missing file yields an empty store; the file is created on
    /// the first write.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or
    /// parsed. Stored notes are never silently discarded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No fallback note file at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, entries })
    }

    /// Path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored notes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the backend holds no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites the backing file from the in-memory map.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl NoteBackend for FileNotes {
    fn name(&self) -> &'static str {
        "file"
    }

    fn put(&mut self, key: &str, text: &str) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            NoteEntry {
                body: text.to_string(),
                updated_at: Utc::now(),
            },
        );
        self.persist()
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.body.clone()))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}
