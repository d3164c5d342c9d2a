use std::env;
use std::path::Path;

use movietheque::clients::omdb_client::OmdbConfig;
use movietheque::storage::csv_storage::CsvStorage;
use movietheque::storage::json_storage::JsonStorage;
use movietheque::storage::Storage;
use movietheque::website::generator::WebsiteConfig;

mod logging;

const DEFAULT_STORAGE_PATH: &str = "movies.json";

// OMDb hands this key out on their free tier.
const DEFAULT_OMDB_API_KEY: &str = "6f0c3bf6";

fn get_storage_path() -> String {
    env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string())
}

fn open_storage(path: &str) -> Box<dyn Storage> {
    let is_csv = Path::new(path)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        Box::new(CsvStorage::new(path))
    } else {
        Box::new(JsonStorage::new(path))
    }
}

#[tokio::main]
async fn main() {
    logging::setup_logging();

    let storage_path = get_storage_path();
    let storage = open_storage(&storage_path);

    let metadata = OmdbConfig {
        api_key: env::var("OMDB_API_KEY").unwrap_or_else(|_| DEFAULT_OMDB_API_KEY.to_string()),
        base_url: None,
    };

    if let Err(e) = movietheque::run(storage, metadata, WebsiteConfig::default()).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
