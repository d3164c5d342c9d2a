use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clients::omdb_client::MetadataLookup;
use crate::model::movie::MovieCollection;

const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
const MOVIE_GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

#[derive(Debug, Error)]
pub enum WebsiteError {
    #[error("failed to read template {path}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write website {path}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration for the website generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteConfig {
    /// Template containing the title and movie-grid placeholder tokens.
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    /// Where the generated page is written, overwriting any existing file.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Display name substituted for the title placeholder.
    #[serde(default = "default_page_title")]
    pub page_title: String,

    /// Image used when a lookup succeeds but carries no poster.
    #[serde(default = "default_placeholder_poster")]
    pub placeholder_poster: String,
}

fn default_template_path() -> PathBuf {
    PathBuf::from("static/index_template.html")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_page_title() -> String {
    "My Movie App".to_string()
}

fn default_placeholder_poster() -> String {
    "https://via.placeholder.com/128x193?text=No+Image".to_string()
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            output_path: default_output_path(),
            page_title: default_page_title(),
            placeholder_poster: default_placeholder_poster(),
        }
    }
}

/// Renders the collection into a static HTML page, enriching each
/// movie through the metadata lookup.
pub struct WebsiteGenerator<'a, L> {
    lookup: &'a L,
    config: WebsiteConfig,
}

impl<'a, L: MetadataLookup> WebsiteGenerator<'a, L> {
    pub fn new(lookup: &'a L, config: WebsiteConfig) -> Self {
        Self { lookup, config }
    }

    /// Writes the page and returns how many movies made it into the
    /// grid. A failed lookup skips that movie and continues with the
    /// rest; only template or output I/O aborts the generation.
    pub async fn generate(&self, movies: &MovieCollection) -> Result<usize, WebsiteError> {
        let template =
            fs::read_to_string(&self.config.template_path).map_err(|e| {
                WebsiteError::TemplateRead {
                    path: self.config.template_path.clone(),
                    source: e,
                }
            })?;

        let mut movie_items = Vec::new();
        for (title, details) in movies {
            let metadata = match self.lookup.lookup_by_title(title).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    log::warn!(
                        "Could not fetch metadata for {}. Ignoring it and continuing. Error was: {}",
                        title,
                        e
                    );
                    continue;
                }
            };

            let poster = metadata
                .poster
                .unwrap_or_else(|| self.config.placeholder_poster.clone());
            let year = metadata.year.unwrap_or(details.year);
            movie_items.push(render_movie_item(title, &poster, year));
        }

        let rendered = movie_items.len();
        let page = template
            .replace(TITLE_PLACEHOLDER, &self.config.page_title)
            .replace(MOVIE_GRID_PLACEHOLDER, &movie_items.join("\n"));

        fs::write(&self.config.output_path, page).map_err(|e| WebsiteError::OutputWrite {
            path: self.config.output_path.clone(),
            source: e,
        })?;

        Ok(rendered)
    }
}

fn render_movie_item(title: &str, poster: &str, year: i32) -> String {
    format!(
        r#"<li>
    <div class="movie">
        <img class="movie-poster" src="{poster}" alt="{title}">
        <div class="movie-title">{title}</div>
        <div class="movie-year">{year}</div>
    </div>
</li>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use async_trait::async_trait;

    use crate::clients::omdb_client::{MetadataError, MovieMetadata};
    use crate::model::movie::MovieDetails;

    const TEMPLATE: &str =
        "<html><h1>__TEMPLATE_TITLE__</h1><ol>__TEMPLATE_MOVIE_GRID__</ol></html>";

    struct FixedLookup {
        entries: HashMap<String, MovieMetadata>,
    }

    impl FixedLookup {
        fn new(entries: &[(&str, Option<i32>, Option<&str>)]) -> Self {
            let entries = entries
                .iter()
                .map(|(title, year, poster)| {
                    (
                        title.to_string(),
                        MovieMetadata {
                            title: title.to_string(),
                            year: *year,
                            rating: None,
                            poster: poster.map(|p| p.to_string()),
                        },
                    )
                })
                .collect();
            Self { entries }
        }
    }

    #[async_trait]
    impl MetadataLookup for FixedLookup {
        async fn lookup_by_title(&self, title: &str) -> Result<MovieMetadata, MetadataError> {
            self.entries
                .get(title)
                .cloned()
                .ok_or_else(|| MetadataError::NotFound {
                    title: title.to_string(),
                    reason: "movie not found".to_string(),
                })
        }
    }

    fn collection(titles: &[(&str, i32)]) -> MovieCollection {
        titles
            .iter()
            .map(|(title, year)| {
                (
                    title.to_string(),
                    MovieDetails {
                        year: *year,
                        rating: 7.0,
                        poster: None,
                    },
                )
            })
            .collect()
    }

    fn config_in(dir: &tempfile::TempDir) -> WebsiteConfig {
        let template_path = dir.path().join("template.html");
        fs::write(&template_path, TEMPLATE).unwrap();
        WebsiteConfig {
            template_path,
            output_path: dir.path().join("index.html"),
            ..WebsiteConfig::default()
        }
    }

    #[tokio::test]
    async fn failing_lookup_skips_only_that_movie() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let output_path = config.output_path.clone();

        let lookup = FixedLookup::new(&[
            ("Alien", Some(1979), Some("http://example.com/alien.jpg")),
            ("Heat", Some(1995), Some("http://example.com/heat.jpg")),
        ]);
        let movies = collection(&[("Alien", 1979), ("Gigli", 2003), ("Heat", 1995)]);

        let generator = WebsiteGenerator::new(&lookup, config);
        let rendered = generator.generate(&movies).await.unwrap();
        assert_eq!(rendered, 2);

        let page = fs::read_to_string(output_path).unwrap();
        assert!(page.contains("Alien"));
        assert!(page.contains("Heat"));
        assert!(!page.contains("Gigli"));
    }

    #[tokio::test]
    async fn missing_poster_falls_back_to_the_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let output_path = config.output_path.clone();
        let placeholder = config.placeholder_poster.clone();

        let lookup = FixedLookup::new(&[("Alien", Some(1979), None)]);
        let movies = collection(&[("Alien", 1979)]);

        let generator = WebsiteGenerator::new(&lookup, config);
        generator.generate(&movies).await.unwrap();

        let page = fs::read_to_string(output_path).unwrap();
        assert!(page.contains(&placeholder));
    }

    #[tokio::test]
    async fn missing_year_falls_back_to_the_stored_one() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let output_path = config.output_path.clone();

        let lookup = FixedLookup::new(&[("Alien", None, Some("http://example.com/alien.jpg"))]);
        let movies = collection(&[("Alien", 1979)]);

        let generator = WebsiteGenerator::new(&lookup, config);
        generator.generate(&movies).await.unwrap();

        let page = fs::read_to_string(output_path).unwrap();
        assert!(page.contains(r#"<div class="movie-year">1979</div>"#));
    }

    #[tokio::test]
    async fn template_content_passes_through_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let output_path = config.output_path.clone();

        let lookup = FixedLookup::new(&[]);
        let movies = MovieCollection::new();

        let generator = WebsiteGenerator::new(&lookup, config);
        let rendered = generator.generate(&movies).await.unwrap();
        assert_eq!(rendered, 0);

        let page = fs::read_to_string(output_path).unwrap();
        assert_eq!(page, "<html><h1>My Movie App</h1><ol></ol></html>");
    }

    #[tokio::test]
    async fn missing_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = WebsiteConfig {
            template_path: dir.path().join("nope.html"),
            output_path: dir.path().join("index.html"),
            ..WebsiteConfig::default()
        };

        let lookup = FixedLookup::new(&[]);
        let generator = WebsiteGenerator::new(&lookup, config);
        let err = generator.generate(&MovieCollection::new()).await.unwrap_err();
        assert!(matches!(err, WebsiteError::TemplateRead { .. }));
    }
}
