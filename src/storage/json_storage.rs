use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::model::movie::{MovieCollection, MovieDetails};

use super::{validate_entry, MutationOutcome, Storage, StorageError};

/// Stores the collection as one pretty-printed JSON object keyed by
/// title, each value holding year/rating/poster.
pub struct JsonStorage {
    file_path: PathBuf,
}

impl JsonStorage {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    fn load(&self) -> Result<MovieCollection, StorageError> {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(MovieCollection::new()),
            Err(e) => {
                return Err(StorageError::Io {
                    path: self.file_path.clone(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|e| StorageError::DataCorruption {
            path: self.file_path.clone(),
            detail: e.to_string(),
        })
    }

    fn save(&self, movies: &MovieCollection) -> Result<(), StorageError> {
        let contents =
            serde_json::to_string_pretty(movies).map_err(|e| StorageError::DataCorruption {
                path: self.file_path.clone(),
                detail: e.to_string(),
            })?;

        fs::write(&self.file_path, contents).map_err(|e| StorageError::Io {
            path: self.file_path.clone(),
            source: e,
        })
    }
}

impl Storage for JsonStorage {
    fn list_movies(&self) -> Result<MovieCollection, StorageError> {
        self.load()
    }

    fn add_movie(
        &self,
        title: &str,
        year: i32,
        rating: f64,
        poster: Option<String>,
    ) -> Result<(), StorageError> {
        validate_entry(title, rating)?;

        let mut movies = self.load()?;
        if movies.contains_key(title) {
            return Err(StorageError::DuplicateEntry {
                title: title.to_string(),
            });
        }

        movies.insert(
            title.to_string(),
            MovieDetails {
                year,
                rating,
                poster,
            },
        );
        self.save(&movies)
    }

    fn delete_movie(&self, title: &str) -> Result<MutationOutcome, StorageError> {
        let mut movies = self.load()?;
        if movies.remove(title).is_none() {
            return Ok(MutationOutcome::NotFound);
        }

        self.save(&movies)?;
        Ok(MutationOutcome::Applied)
    }

    fn update_movie(&self, title: &str, rating: f64) -> Result<MutationOutcome, StorageError> {
        let mut movies = self.load()?;
        match movies.get_mut(title) {
            Some(details) => details.rating = rating,
            None => return Ok(MutationOutcome::NotFound),
        }

        self.save(&movies)?;
        Ok(MutationOutcome::Applied)
    }
}
