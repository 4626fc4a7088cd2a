//! Error types for groundschool.
//!
//! This module defines all error types used throughout the groundschool crate,
//! providing detailed context for debugging and user-friendly error messages.
//! Note persistence deliberately does not surface errors through these types
//! during a study session; the note store logs and swallows its own failures.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for groundschool operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the notes database.
    #[error("failed to open notes database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Dataset Errors ===
    /// Failed to read a question set file.
    #[error("failed to read question set {path}: {source}")]
    DatasetRead {
        /// Path to the question set file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a question set.
    #[error("failed to parse {category} question set: {source}")]
    DatasetParse {
        /// Name of the category the set belongs to.
        category: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Note Errors ===
    /// No note is stored for the given question.
    #[error("no note stored for question {question_id}")]
    NoteNotFound {
        /// The question id that was looked up.
        question_id: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Terminal Errors ===
    /// Terminal setup or teardown failed.
    #[error("terminal error: {0}")]
    Terminal(String),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for groundschool operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new terminal error.
    #[must_use]
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a note-not-found error for a question id.
    #[must_use]
    pub fn note_not_found(question_id: impl Into<String>) -> Self {
        Self::NoteNotFound {
            question_id: question_id.into(),
        }
    }

    /// Check if this error means a note lookup came back empty.
    #[must_use]
    pub fn is_note_not_found(&self) -> bool {
        matches!(self, Self::NoteNotFound { .. })
    }
}
