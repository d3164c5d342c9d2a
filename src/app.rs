use std::io::{self, Write};

use thiserror::Error;

use crate::clients::omdb_client::{MetadataError, OmdbClient};
use crate::model::movie::MovieCollection;
use crate::storage::{Storage, StorageError};
use crate::website::generator::{WebsiteConfig, WebsiteError, WebsiteGenerator};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Website(#[from] WebsiteError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Interactive command loop over a storage backend. Storage errors
/// propagate out of `run`; a corrupted backing file has no recovery
/// here, the user has to fix or discard it.
pub struct MovieApp {
    storage: Box<dyn Storage>,
    metadata: OmdbClient,
    website: WebsiteConfig,
}

impl MovieApp {
    pub fn new(storage: Box<dyn Storage>, metadata: OmdbClient, website: WebsiteConfig) -> Self {
        Self {
            storage,
            metadata,
            website,
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        loop {
            println!();
            println!("Menu:");
            println!("1. List movies");
            println!("2. Movie statistics");
            println!("3. Generate website");
            println!("4. Quit");
            let choice = prompt("Choose an option: ");
            println!();

            match choice.trim() {
                "1" => self.list_movies()?,
                "2" => self.movie_stats()?,
                "3" => self.generate_website().await?,
                "4" => {
                    println!("Goodbye!");
                    return Ok(());
                }
                _ => println!("Invalid option. Please try again."),
            }
        }
    }

    fn list_movies(&self) -> Result<(), AppError> {
        let movies = self.storage.list_movies()?;
        println!("There are {} movies in total:", movies.len());
        for (title, details) in &movies {
            println!("{} ({}): {}", title, details.year, details.rating);
        }

        prompt("\nPress Enter to return to the menu...");
        Ok(())
    }

    fn movie_stats(&self) -> Result<(), AppError> {
        let movies = self.storage.list_movies()?;
        match rating_stats(&movies) {
            None => println!("No movies to analyze."),
            Some(stats) => {
                println!("Average Rating: {:.2}", stats.average);
                println!("Highest Rated: {}", stats.highest);
                println!("Lowest Rated: {}", stats.lowest);
            }
        }
        Ok(())
    }

    async fn generate_website(&self) -> Result<(), AppError> {
        let movies = self.storage.list_movies()?;
        let generator = WebsiteGenerator::new(&self.metadata, self.website.clone());
        generator.generate(&movies).await?;
        println!(
            "Website generated successfully: {}",
            self.website.output_path.display()
        );
        Ok(())
    }
}

fn prompt(message: &str) -> String {
    print!("{}", message);
    io::stdout().flush().expect("could not flush stdout");
    let mut user_input = String::new();
    io::stdin()
        .read_line(&mut user_input)
        .expect("Failed to read user input");
    user_input
}

#[derive(Debug, PartialEq)]
pub struct RatingStats {
    pub average: f64,
    pub highest: String,
    pub lowest: String,
}

/// Mean rating plus the titles at both extremes. Ties keep the first
/// title in collection order, which is lexicographic.
pub fn rating_stats(movies: &MovieCollection) -> Option<RatingStats> {
    let first = movies.iter().next()?;

    let mut total = 0.0;
    let mut highest = first;
    let mut lowest = first;
    for entry in movies {
        total += entry.1.rating;
        if entry.1.rating > highest.1.rating {
            highest = entry;
        }
        if entry.1.rating < lowest.1.rating {
            lowest = entry;
        }
    }

    Some(RatingStats {
        average: total / movies.len() as f64,
        highest: highest.0.clone(),
        lowest: lowest.0.clone(),
    })
}
