use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// All movies keyed by title. BTreeMap keeps iteration order stable
/// (lexicographic by title) independent of the backing format.
pub type MovieCollection = BTreeMap<String, MovieDetails>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub year: i32,
    pub rating: f64,
    #[serde(default)]
    pub poster: Option<String>,
}

impl MovieDetails {
    pub fn csv_header() -> Vec<&'static str> {
        return vec!["title", "rating", "year", "poster"];
    }

    pub fn to_csv_record(&self, title: &str) -> Vec<String> {
        return vec![
            title.to_string(),
            self.rating.to_string(),
            self.year.to_string(),
            self.poster.clone().unwrap_or("".to_string()),
        ];
    }
}
