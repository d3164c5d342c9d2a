use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use csv::{Reader, StringRecord, Writer};

use crate::model::movie::{MovieCollection, MovieDetails};

use super::{validate_entry, MutationOutcome, Storage, StorageError};

/// Stores the collection as a flat table with a `title,rating,year,poster`
/// header row. The read path parses exactly the schema the write path
/// emits; an absent poster is an empty field.
pub struct CsvStorage {
    file_path: PathBuf,
}

impl CsvStorage {
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
        if contents.trim().is_empty() {
            return Ok(MovieCollection::new());
        }

        let mut reader = Reader::from_reader(contents.as_bytes());
        let header = reader
            .headers()
            .map_err(|e| self.corruption(e.to_string()))?
            .clone();
        if header != MovieDetails::csv_header() {
            return Err(self.corruption(format!("unexpected header row: {:?}", header)));
        }

        let mut movies = MovieCollection::new();
        for record in reader.records() {
            let record = record.map_err(|e| self.corruption(e.to_string()))?;
            let (title, details) = self.parse_record(&record)?;
            movies.insert(title, details);
        }
        Ok(movies)
    }

    fn parse_record(&self, record: &StringRecord) -> Result<(String, MovieDetails), StorageError> {
        let field = |idx: usize| {
            record
                .get(idx)
                .ok_or_else(|| self.corruption(format!("row is missing field {}: {:?}", idx, record)))
        };

        let title = field(0)?.to_string();
        let rating = field(1)?
            .parse::<f64>()
            .map_err(|_| self.corruption(format!("bad rating in row {:?}", record)))?;
        let year = field(2)?
            .parse::<i32>()
            .map_err(|_| self.corruption(format!("bad year in row {:?}", record)))?;
        let poster = match field(3)? {
            "" => None,
            url => Some(url.to_string()),
        };

        Ok((
            title,
            MovieDetails {
                year,
                rating,
                poster,
            },
        ))
    }

    fn save(&self, movies: &MovieCollection) -> Result<(), StorageError> {
        let mut writer = Writer::from_writer(Vec::new());
        writer
            .write_record(MovieDetails::csv_header())
            .map_err(|e| self.corruption(e.to_string()))?;
        for (title, details) in movies {
            writer
                .write_record(details.to_csv_record(title))
                .map_err(|e| self.corruption(e.to_string()))?;
        }

        let buffer = writer
            .into_inner()
            .map_err(|e| self.corruption(e.to_string()))?;
        fs::write(&self.file_path, buffer).map_err(|e| StorageError::Io {
            path: self.file_path.clone(),
            source: e,
        })
    }

    fn corruption(&self, detail: String) -> StorageError {
        StorageError::DataCorruption {
            path: self.file_path.clone(),
            detail,
        }
    }
}

impl Storage for CsvStorage {
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
