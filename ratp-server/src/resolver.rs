//! Line and station resolution.
//!
//! Turns user-facing references into upstream identifiers: a line display
//! name becomes an opaque line id through the conversion table, and a
//! free-text station name becomes a station id by fuzzy matching against
//! the live stop list of that line.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Category, StationId};
use crate::idfm::{StationRecord, TransitClient, TransitError};
use crate::similarity::similarity;
use crate::tables::LineTables;

/// Default minimum similarity for a station name to be accepted.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.70;

/// Errors from resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The category has no line with this display name
    #[error("unknown {category} line '{name}'")]
    UnknownLine { category: Category, name: String },

    /// No station of the line is close enough to the query
    #[error("no station matching '{query}' on {category} line '{line}'")]
    StationNotFound {
        category: Category,
        line: String,
        query: String,
    },

    /// The stop list could not be fetched
    #[error(transparent)]
    Transit(#[from] TransitError),
}

/// Resolver settings.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// A station matches only if its similarity is strictly above this.
    pub match_threshold: f64,
}

impl ResolverConfig {
    /// Create a config with the given acceptance threshold.
    pub fn new(match_threshold: f64) -> Self {
        Self { match_threshold }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

/// Source of the live stop list of a line.
pub trait StationSource {
    fn stations(
        &self,
        line_id: &str,
    ) -> impl Future<Output = Result<Vec<StationRecord>, TransitError>> + Send;
}

impl StationSource for TransitClient {
    async fn stations(&self, line_id: &str) -> Result<Vec<StationRecord>, TransitError> {
        self.get_stations(line_id, false, false).await
    }
}

/// A station accepted by fuzzy matching.
#[derive(Debug, Clone, PartialEq)]
pub struct StationMatch {
    pub station_id: StationId,
    /// Upstream name of the matched station
    pub name: String,
    pub score: f64,
}

/// Best-scoring station for `query`, if it scores above `threshold`.
///
/// Scans every candidate once. On equal scores the first candidate in input
/// order is kept.
pub fn best_station_match(
    stations: &[StationRecord],
    query: &str,
    threshold: f64,
) -> Option<StationMatch> {
    let mut best: Option<(&StationRecord, f64)> = None;

    for station in stations {
        let score = similarity(query, &station.name);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((station, score));
        }
    }

    let (station, score) = best?;
    if score > threshold {
        Some(StationMatch {
            station_id: station.station_id(),
            name: station.name.clone(),
            score,
        })
    } else {
        debug!(query, closest = %station.name, score, "no station above threshold");
        None
    }
}

/// Resolves lines and stations against a table snapshot.
#[derive(Debug, Clone)]
pub struct Resolver<S = TransitClient> {
    tables: Arc<LineTables>,
    stations: S,
    config: ResolverConfig,
}

impl<S: StationSource> Resolver<S> {
    /// Create a resolver over the given tables and stop-list source.
    pub fn new(tables: Arc<LineTables>, stations: S, config: ResolverConfig) -> Self {
        Self {
            tables,
            stations,
            config,
        }
    }

    /// The table snapshot in use.
    pub fn tables(&self) -> &LineTables {
        &self.tables
    }

    /// The stop-list source.
    pub fn source(&self) -> &S {
        &self.stations
    }

    /// Opaque id of a line, from its category and display name.
    pub fn resolve_line(&self, category: Category, display_name: &str) -> Result<&str, ResolveError> {
        self.tables
            .line_id(category, display_name)
            .ok_or_else(|| ResolveError::UnknownLine {
                category,
                name: display_name.to_string(),
            })
    }

    /// Station of a line whose name best matches `query`.
    ///
    /// Fetches the live stop list of the line on every call.
    pub async fn resolve_station(
        &self,
        category: Category,
        line: &str,
        query: &str,
    ) -> Result<StationMatch, ResolveError> {
        let line_id = self.resolve_line(category, line)?;
        let stations = self.stations.stations(line_id).await?;

        best_station_match(&stations, query, self.config.match_threshold).ok_or_else(|| {
            ResolveError::StationNotFound {
                category,
                line: line.to_string(),
                query: query.to_string(),
            }
        })
    }
}
