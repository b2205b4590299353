//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, LineRecord};
use crate::resolver::StationMatch;
use crate::tables::LineMatch;

/// A line with its resolved id.
#[derive(Debug, Serialize)]
pub struct LineResult {
    /// Transport category
    pub category: Category,

    /// Opaque upstream line id
    pub line_id: String,

    /// Display name (e.g., "4", "RER B")
    pub name: String,

    /// Group of lines
    pub group_name: Option<String>,

    /// Operating company
    pub operator_name: Option<String>,

    /// Network
    pub network_name: Option<String>,
}

/// Lines of one category.
#[derive(Debug, Serialize)]
pub struct LineListResponse {
    pub category: Category,
    pub lines: Vec<LineResult>,
}

/// Request to search lines by name.
#[derive(Debug, Deserialize)]
pub struct LineSearchRequest {
    /// Part of the line name
    pub q: String,

    /// Maximum number of results (defaults to 5)
    pub limit: Option<usize>,
}

/// Lines matching a search.
#[derive(Debug, Serialize)]
pub struct LineSearchResponse {
    pub lines: Vec<LineResult>,
}

/// Request to resolve a station name.
#[derive(Debug, Deserialize)]
pub struct StationResolveRequest {
    /// Free-text station name
    pub q: String,
}

/// A resolved station.
#[derive(Debug, Serialize)]
pub struct StationMatchResult {
    /// Short upstream station id
    pub station_id: String,

    /// Upstream station name
    pub name: String,

    /// Similarity of the query to the name
    pub score: f64,
}

/// Optional parameters of a schedules request.
#[derive(Debug, Deserialize)]
pub struct SchedulesRequest {
    /// Free-text station name; whole-line schedules when absent
    pub station: Option<String>,

    /// Include real-time data (defaults to true)
    pub realtime: Option<bool>,

    /// Ask for complete schedules (defaults to false)
    pub complete: Option<bool>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl LineResult {
    pub fn from_record(category: Category, line_id: &str, record: &LineRecord) -> Self {
        Self {
            category,
            line_id: line_id.to_string(),
            name: record.display_name.clone(),
            group_name: record.group_name.clone(),
            operator_name: record.operator_name.clone(),
            network_name: record.network_name.clone(),
        }
    }

    pub fn from_match(m: &LineMatch<'_>) -> Self {
        Self::from_record(m.category, m.line_id, m.record)
    }
}

impl From<StationMatch> for StationMatchResult {
    fn from(m: StationMatch) -> Self {
        Self {
            station_id: m.station_id.as_str().to_string(),
            name: m.name,
            score: m.score,
        }
    }
}
