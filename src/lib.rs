pub mod app;
pub mod clients;
pub mod model;
pub mod storage;
pub mod website;

use app::{AppError, MovieApp};
use clients::omdb_client::{OmdbClient, OmdbConfig};
use storage::Storage;
use website::generator::WebsiteConfig;

pub async fn run(
    storage: Box<dyn Storage>,
    metadata: OmdbConfig,
    website: WebsiteConfig,
) -> Result<(), AppError> {
    let client = OmdbClient::new(metadata)?;
    let app = MovieApp::new(storage, client, website);
    app.run().await
}
