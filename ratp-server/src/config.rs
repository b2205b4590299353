//! Server configuration.
//!
//! Every setting has a default and can be overridden through a `RATP_*`
//! environment variable.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::catalog::{CatalogClientConfig, DEFAULT_CATALOG_URL};
use crate::idfm::{DEFAULT_HOST, TransitConfig};
use crate::resolver::{DEFAULT_MATCH_THRESHOLD, ResolverConfig};

/// Error returned when a setting cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {key}: '{value}' ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Configuration for the whole server.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Reference catalog export URL
    pub catalog_url: String,

    /// Transit API scheme
    pub api_scheme: String,

    /// Transit API host
    pub api_host: String,

    /// Directory holding the persisted line tables
    pub data_dir: PathBuf,

    /// Station match acceptance threshold, in [0, 1]
    pub match_threshold: f64,

    /// Timeout for every upstream request (seconds)
    pub timeout_secs: u64,

    /// Address the HTTP server listens on
    pub bind: SocketAddr,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("RATP_CATALOG_URL") {
            config.catalog_url = url;
        }
        if let Some(scheme) = lookup("RATP_API_SCHEME") {
            config.api_scheme = scheme;
        }
        if let Some(host) = lookup("RATP_API_HOST") {
            config.api_host = host;
        }
        if let Some(dir) = lookup("RATP_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("RATP_MATCH_THRESHOLD") {
            let threshold: f64 = parse("RATP_MATCH_THRESHOLD", &value)?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError {
                    key: "RATP_MATCH_THRESHOLD",
                    value,
                    reason: "must be between 0 and 1".to_string(),
                });
            }
            config.match_threshold = threshold;
        }
        if let Some(value) = lookup("RATP_TIMEOUT_SECS") {
            let timeout: u64 = parse("RATP_TIMEOUT_SECS", &value)?;
            if timeout == 0 {
                return Err(ConfigError {
                    key: "RATP_TIMEOUT_SECS",
                    value,
                    reason: "must be at least 1 second".to_string(),
                });
            }
            config.timeout_secs = timeout;
        }
        if let Some(value) = lookup("RATP_BIND") {
            config.bind = parse("RATP_BIND", &value)?;
        }

        Ok(config)
    }

    /// Settings for the catalog client.
    pub fn catalog(&self) -> CatalogClientConfig {
        CatalogClientConfig::new(&self.catalog_url).with_timeout(self.timeout_secs)
    }

    /// Settings for the transit API client.
    pub fn transit(&self) -> TransitConfig {
        TransitConfig::new(&self.api_host)
            .with_scheme(&self.api_scheme)
            .with_timeout(self.timeout_secs)
    }

    /// Settings for the resolver.
    pub fn resolver(&self) -> ResolverConfig {
        ResolverConfig::new(self.match_threshold)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            api_scheme: "https".to_string(),
            api_host: DEFAULT_HOST.to_string(),
            data_dir: PathBuf::from("data"),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            timeout_secs: 5,
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
