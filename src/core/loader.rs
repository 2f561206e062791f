use crate::core::engine::ListingEngine;
use crate::domain::model::Listing;
use crate::domain::ports::{ListingSource, Storage};
use crate::utils::error::{EngineError, Result};
use crate::utils::validation::{validate_file_extension, Validate};
use async_trait::async_trait;
use serde::Deserialize;

pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl DataFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        validate_file_extension("data.path", path, &SUPPORTED_EXTENSIONS)?;
        let is_csv = std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        Ok(if is_csv { DataFormat::Csv } else { DataFormat::Json })
    }
}

/// CSV has no null, so optional attributes arrive as empty cells.
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: u64,
    first_name: String,
    last_name: String,
    email: String,
    country: String,
    language: String,
    color: String,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl From<CsvRow> for Listing {
    fn from(row: CsvRow) -> Self {
        Listing {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            country: non_empty(row.country),
            language: non_empty(row.language),
            color: non_empty(row.color),
        }
    }
}

pub fn decode_listings(bytes: &[u8], format: DataFormat) -> Result<Vec<Listing>> {
    match format {
        DataFormat::Json => Ok(serde_json::from_slice(bytes)?),
        DataFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(bytes);
            reader
                .deserialize::<CsvRow>()
                .map(|row| row.map(Listing::from).map_err(EngineError::from))
                .collect()
        }
    }
}

/// Reads a JSON or CSV data file through a [`Storage`] backend.
#[derive(Debug, Clone)]
pub struct FileListingSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> FileListingSource<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<S: Storage> ListingSource for FileListingSource<S> {
    async fn fetch(&self) -> Result<Vec<Listing>> {
        let format = DataFormat::from_path(&self.path)?;
        tracing::debug!("Reading {:?} listings from {}", format, self.path);
        let bytes = self.storage.read_file(&self.path).await?;
        decode_listings(&bytes, format)
    }
}

/// A fixed in-memory collection, mostly useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticListingSource {
    listings: Vec<Listing>,
}

impl StaticListingSource {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }
}

#[async_trait]
impl ListingSource for StaticListingSource {
    async fn fetch(&self) -> Result<Vec<Listing>> {
        Ok(self.listings.clone())
    }
}

/// Fetches, validates and hands the collection to a new engine.
pub async fn load_engine<L: ListingSource + ?Sized>(source: &L) -> Result<ListingEngine> {
    let listings = source.fetch().await?;
    listings.validate()?;
    tracing::info!("Loaded {} listings", listings.len());
    Ok(ListingEngine::new(listings))
}

/// Like [`load_engine`], but reports an empty collection as a configuration problem.
pub async fn load_non_empty_engine<L: ListingSource + ?Sized>(source: &L) -> Result<ListingEngine> {
    let engine = load_engine(source).await?;
    if engine.is_empty() {
        return Err(EngineError::ConfigError {
            message: "data file contains no listings".to_string(),
        });
    }
    Ok(engine)
}
