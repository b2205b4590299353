//! Reference line catalog client.

use serde::Deserialize;
use tracing::{debug, info};

use super::error::CatalogError;

/// Default endpoint of the reference line dataset (JSON export).
pub const DEFAULT_CATALOG_URL: &str = "https://data.iledefrance-mobilites.fr/explore/dataset/referentiel-des-lignes/download/?format=json&timezone=Europe/Berlin&lang=fr";

/// One line as described by the reference dataset.
///
/// Only lives for the duration of an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLineEntry {
    pub name_line: String,
    pub id_line: String,
    /// Upstream vocabulary: metro, tram, funicular, bus, rail.
    #[serde(rename = "transportmode")]
    pub transport_mode: String,
    #[serde(rename = "shortname_groupoflines", default)]
    pub group_name: Option<String>,
    #[serde(rename = "operatorname", default)]
    pub operator_name: Option<String>,
    #[serde(rename = "networkname", default)]
    pub network_name: Option<String>,
}

/// Dataset record: the interesting data sits in a nested field bag.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    fields: RawLineEntry,
}

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Full URL of the dataset export
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CatalogClientConfig {
    /// Create a config pointing at the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 5,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

/// Client for the reference line dataset.
///
/// Issues a single read per call and never retries.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    url: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Fetch every line of the reference dataset.
    pub async fn fetch_all(&self) -> Result<Vec<RawLineEntry>, CatalogError> {
        debug!(url = %self.url, "fetching reference catalog");

        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let entries = parse_catalog(&body)?;

        info!(lines = entries.len(), "fetched reference catalog");
        Ok(entries)
    }
}

/// Parse a dataset export into raw line entries.
///
/// The payload must be a JSON array; every record must carry a `fields`
/// object with at least `name_line`, `id_line` and `transportmode`.
pub fn parse_catalog(body: &str) -> Result<Vec<RawLineEntry>, CatalogError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| CatalogError::Format {
            message: e.to_string(),
        })?;

    let serde_json::Value::Array(records) = value else {
        return Err(CatalogError::Format {
            message: "expected a JSON array of records".to_string(),
        });
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<CatalogRecord>(record)
                .map(|r| r.fields)
                .map_err(|e| CatalogError::Format {
                    message: format!("record {index}: {e}"),
                })
        })
        .collect()
}
