use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    Retry,
};

/// Errors from the metadata lookup service.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata service returned status {status}")]
    Api { status: u16 },

    #[error("no metadata found for '{title}': {reason}")]
    NotFound { title: String, reason: String },

    #[error("metadata client not configured: {0}")]
    NotConfigured(String),
}

/// OMDb API client configuration. The key and endpoint are injected
/// here rather than living as literals inside the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    pub api_key: String,
    /// Base URL (default: http://www.omdbapi.com/).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Canonical metadata for one movie. OMDb serves every field as a
/// string; `"N/A"` and unparseable values normalize to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMetadata {
    pub title: String,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub poster: Option<String>,
}

/// Lookup of movie metadata by exact title.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn lookup_by_title(&self, title: &str) -> Result<MovieMetadata, MetadataError>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig) -> Result<Self, MetadataError> {
        if config.api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let base_url = config
            .base_url
            .unwrap_or_else(|| "http://www.omdbapi.com/".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    async fn fetch_title(&self, title: &str) -> Result<OmdbResponse, MetadataError> {
        let retry_strategy = ExponentialBackoff::from_millis(10).map(jitter).take(5);
        Retry::spawn(retry_strategy, || async move {
            self.fetch_title_no_retry(title).await
        })
        .await
    }

    async fn fetch_title_no_retry(&self, title: &str) -> Result<OmdbResponse, MetadataError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Api {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MetadataLookup for OmdbClient {
    async fn lookup_by_title(&self, title: &str) -> Result<MovieMetadata, MetadataError> {
        log::info!("Fetching metadata for movie {}", title);

        let raw = self.fetch_title(title).await?;
        if !raw.is_ok() {
            return Err(MetadataError::NotFound {
                title: title.to_string(),
                reason: raw.error.unwrap_or_else(|| "movie not found".to_string()),
            });
        }

        Ok(raw.into_metadata(title))
    }
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbResponse {
    fn is_ok(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }

    fn into_metadata(self, requested_title: &str) -> MovieMetadata {
        MovieMetadata {
            title: self
                .title
                .unwrap_or_else(|| requested_title.to_string()),
            year: normalize_field(self.year).as_deref().and_then(parse_year),
            rating: normalize_field(self.imdb_rating).and_then(|r| r.parse().ok()),
            poster: normalize_field(self.poster),
        }
    }
}

fn normalize_field(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

// OMDb years come as "1999" for movies but "2010–2015" for series;
// the leading number is the release year either way.
fn parse_year(raw: &str) -> Option<i32> {
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
