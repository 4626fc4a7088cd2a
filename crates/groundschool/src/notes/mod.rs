//! Note persistence.
//!
//! Per-question notes live under string keys derived from the question
//! id. Two backends exist: a `SQLite` database and a plain JSON file
//! used as fallback. The [`NoteStore`] front tries the primary first
//! and downgrades every backend failure to a log line, because losing
//! a note must never take the trainer down.

pub mod file;
pub mod sqlite;
pub mod worker;

use std::path::Path;

use tracing::warn;

use crate::error::Result;
use file::FileNotes;
use sqlite::SqliteNotes;

/// Prefix that turns a question id into a note key.
pub const KEY_PREFIX: &str = "q-";

/// The note key for a question id.
#[must_use]
pub fn note_key(question_id: &str) -> String {
    format!("{KEY_PREFIX}{question_id}")
}

/// The question id a note key refers to, if the key carries the
/// expected prefix.
#[must_use]
pub fn question_id(key: &str) -> Option<&str> {
    key.strip_prefix(KEY_PREFIX)
}

/// A key-value store for note text.
pub trait NoteBackend: Send {
    /// Short backend name for log lines.
    fn name(&self) -> &'static str;

    /// Stores `text` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot complete the write.
    fn put(&mut self, key: &str, text: &str) -> Result<()>;

    /// Loads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read. A missing key
    /// is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// All keys in the backend, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>>;

    /// Removes the value under `key`, reporting whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot complete the removal.
    fn remove(&mut self, key: &str) -> Result<bool>;
}

/// Which backend handled an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTier {
    /// The `SQLite` database.
    Primary,
    /// The JSON fallback file.
    Fallback,
}

/// Two-tier note store.
///
/// Writes go to the primary backend and fall through to the fallback
/// only when the primary fails. Reads treat a missing key on a healthy
/// backend as an empty note; the fallback is consulted only when the
/// primary errors out. All failures are logged and absorbed.
pub struct NoteStore {
    primary: Option<Box<dyn NoteBackend>>,
    fallback: Option<Box<dyn NoteBackend>>,
}

impl std::fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore")
            .field("primary", &self.primary.as_ref().map(|b| b.name()))
            .field("fallback", &self.fallback.as_ref().map(|b| b.name()))
            .finish()
    }
}

impl NoteStore {
    /// Opens the store over a database path and a fallback file path.
    ///
    /// A backend that fails to open is logged and left out rather than
    /// failing the whole store. With both backends gone the store
    /// still works; it just saves nothing and loads empty notes.
    #[must_use]
    pub fn open(database_path: &Path, fallback_path: &Path) -> Self {
        let primary: Option<Box<dyn NoteBackend>> = match SqliteNotes::open(database_path) {
            Ok(backend) => Some(Box::new(backend)),
            Err(err) => {
                warn!(path = %database_path.display(), %err, "notes database unavailable");
                None
            }
        };
        let fallback: Option<Box<dyn NoteBackend>> = match FileNotes::open(fallback_path) {
            Ok(backend) => Some(Box::new(backend)),
            Err(err) => {
                warn!(path = %fallback_path.display(), %err, "fallback note file unavailable");
                None
            }
        };
        if primary.is_none() && fallback.is_none() {
            warn!("no note backend available, notes will not be saved");
        }
        Self { primary, fallback }
    }

    /// Builds a store from explicit backends. Tests use this to inject
    /// doubles.
    #[must_use]
    pub fn with_backends(
        primary: Option<Box<dyn NoteBackend>>,
        fallback: Option<Box<dyn NoteBackend>>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Saves a note, reporting the tier that accepted the write.
    ///
    /// An empty draft removes the stored note instead of writing an
    /// empty row. Returns `None` when every backend failed or none is
    /// configured.
    pub fn save(&mut self, question_id: &str, text: &str) -> Option<StoreTier> {
        let key = note_key(question_id);
        let tiers = [
            (StoreTier::Primary, self.primary.as_mut()),
            (StoreTier::Fallback, self.fallback.as_mut()),
        ];
        for (tier, backend) in tiers {
            let Some(backend) = backend else { continue };
            let result = if text.is_empty() {
                backend.remove(&key).map(|_| ())
            } else {
                backend.put(&key, text)
            };
            match result {
                Ok(()) => return Some(tier),
                Err(err) => {
                    warn!(backend = backend.name(), key, %err, "note save failed");
                }
            }
        }
        None
    }

    /// Loads the note for a question, defaulting to an empty string.
    ///
    /// A healthy backend that holds no note settles the lookup as
    /// empty; only a backend error moves the lookup to the next tier.
    #[must_use]
    pub fn load(&self, question_id: &str) -> String {
        let key = note_key(question_id);
        for backend in [self.primary.as_ref(), self.fallback.as_ref()] {
            let Some(backend) = backend else { continue };
            match backend.get(&key) {
                Ok(Some(text)) => return text,
                Ok(None) => return String::new(),
                Err(err) => {
                    warn!(backend = backend.name(), key, %err, "note load failed");
                }
            }
        }
        String::new()
    }

    /// Question ids that have a stored note, from the first backend
    /// that answers.
    #[must_use]
    pub fn question_ids(&self) -> Vec<String> {
        for backend in [self.primary.as_ref(), self.fallback.as_ref()] {
            let Some(backend) = backend else { continue };
            match backend.keys() {
                Ok(keys) => {
                    return keys
                        .iter()
                        .filter_map(|key| question_id(key))
                        .map(ToString::to_string)
                        .collect();
                }
                Err(err) => {
                    warn!(backend = backend.name(), %err, "note key listing failed");
                }
            }
        }
        Vec::new()
    }

    /// Removes a note from every backend, reporting whether any tier
    /// held it.
    pub fn wipe(&mut self, question_id: &str) -> bool {
        let key = note_key(question_id);
        let mut removed = false;
        for backend in [self.primary.as_mut(), self.fallback.as_mut()] {
            let Some(backend) = backend else { continue };
            match backend.remove(&key) {
                Ok(hit) => removed = removed || hit,
                Err(err) => {
                    warn!(backend = backend.name(), key, %err, "note removal failed");
                }
            }
        }
        removed
    }
}
