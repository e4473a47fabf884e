use std::path::PathBuf;
use std::sync::Arc;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use crate::entities::{Dataset, Year};
use crate::error::ShowcaseError;

/// Where per-year documents come from. One retrieval per call, no retries.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, year: Year) -> Result<Vec<u8>, ShowcaseError>;
}

/// Reads `<data_dir>/<year>.json`.
pub struct FileDatasetSource {
    data_dir: PathBuf,
}

impl FileDatasetSource {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn document_path(&self, year: Year) -> PathBuf {
        self.data_dir.join(format!("{}.json", year))
    }
}

#[async_trait]
impl DatasetSource for FileDatasetSource {
    async fn fetch(&self, year: Year) -> Result<Vec<u8>, ShowcaseError> {
        let path = self.document_path(year);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ShowcaseError::DatasetNotFound(year)),
            Err(e) => Err(ShowcaseError::DatasetIOError(e)),
        }
    }
}

/// Fetches `<base_url>/<year>.json` over HTTP.
pub struct HttpDatasetSource {
    client: Client,
    base_url: String,
}

impl HttpDatasetSource {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn document_url(&self, year: Year) -> String {
        format!("{}/{}.json", self.base_url, year)
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self, year: Year) -> Result<Vec<u8>, ShowcaseError> {
        let url = self.document_url(year);
        let res = self.client.get(&url).send().await.map_err(ShowcaseError::DatasetTransport)?;
        let status = res.status();
        if !status.is_success() {
            if status != StatusCode::NOT_FOUND {
                warn!("dataset request {} answered {}", url, status);
            }
            return Err(ShowcaseError::DatasetNotFound(year));
        }
        let bytes = res.bytes().await.map_err(ShowcaseError::DatasetTransport)?;
        Ok(bytes.to_vec())
    }
}

/// Loads and decodes one year's dataset. Every call hits the source again.
#[derive(Clone)]
pub struct DatasetLoader {
    source: Arc<dyn DatasetSource>,
    current_year: Year,
}

impl DatasetLoader {
    pub fn new(source: Arc<dyn DatasetSource>, current_year: Year) -> Self {
        Self { source, current_year }
    }

    pub fn current_year(&self) -> Year {
        self.current_year
    }

    /// Resolves a raw year parameter against the configured current year.
    pub fn year_or_current(&self, raw: Option<&str>) -> Year {
        Year::parse_or(raw, self.current_year)
    }

    pub async fn load(&self, year: Year) -> Result<Dataset, ShowcaseError> {
        debug!("loading dataset for {}", year);
        let payload = self.source.fetch(year).await?;
        let dataset = Dataset::decode(year, &payload).map_err(|e| {
            warn!("{}", e);
            e
        })?;
        if dataset.is_empty() {
            debug!("dataset {} has no records", year);
            return Ok(dataset);
        }
        debug!(
            "dataset {} loaded: {} designers, {} posts, {} videos, {} teams",
            year, dataset.designers.len(), dataset.posts.len(), dataset.videos.len(), dataset.teams.len()
        );
        Ok(dataset)
    }
}
