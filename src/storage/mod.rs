//! File-backed persistence for the movie collection.

pub mod csv_storage;
pub mod json_storage;

use std::path::PathBuf;

use thiserror::Error;

use crate::model::movie::MovieCollection;

/// Errors raised by the storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Rejected arguments to a mutation (empty title, non-finite rating).
    #[error("invalid movie entry: {reason}")]
    InvalidInput { reason: String },

    /// Adding a title that is already in the collection.
    #[error("movie '{title}' is already in the collection")]
    DuplicateEntry { title: String },

    /// The backing file exists but cannot be parsed.
    #[error("movie file {path} is corrupted: {detail}")]
    DataCorruption { path: PathBuf, detail: String },

    /// The backing file could not be read or written.
    #[error("failed to access movie file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Whether a delete/update found its target. A missing title is an
/// outcome the caller is told about, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    NotFound,
}

/// Capability contract over a persisted movie collection.
///
/// Every mutation reloads the full collection, applies the change in
/// memory and rewrites the backing file. Implementations own their
/// serialization format end to end.
pub trait Storage {
    /// Returns all stored movies. A missing backing file is an empty
    /// collection, not an error.
    fn list_movies(&self) -> Result<MovieCollection, StorageError>;

    /// Inserts a new movie. Fails on invalid fields or a duplicate
    /// title; the backing file only changes on success.
    fn add_movie(
        &self,
        title: &str,
        year: i32,
        rating: f64,
        poster: Option<String>,
    ) -> Result<(), StorageError>;

    /// Removes a movie by title.
    fn delete_movie(&self, title: &str) -> Result<MutationOutcome, StorageError>;

    /// Replaces the rating of an existing movie, leaving year and
    /// poster untouched.
    fn update_movie(&self, title: &str, rating: f64) -> Result<MutationOutcome, StorageError>;
}

pub(crate) fn validate_entry(title: &str, rating: f64) -> Result<(), StorageError> {
    if title.trim().is_empty() {
        return Err(StorageError::InvalidInput {
            reason: "title must not be empty".to_string(),
        });
    }
    if !rating.is_finite() {
        return Err(StorageError::InvalidInput {
            reason: format!("rating must be a finite number, got {}", rating),
        });
    }
    Ok(())
}
