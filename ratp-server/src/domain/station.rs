//! Station identifier type.

use std::fmt;

/// Short upstream station identifier (e.g., "71264").
///
/// The upstream stop lists return qualified ids such as
/// `stop_area:IDFM:71264`; only the last segment is needed to build
/// station-scoped URLs.
///
/// # Examples
///
/// ```
/// use ratp_server::domain::StationId;
///
/// let id = StationId::from_upstream("stop_area:IDFM:71264");
/// assert_eq!(id.as_str(), "71264");
///
/// // Already-short ids pass through
/// assert_eq!(StationId::from_upstream("71264").as_str(), "71264");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

impl StationId {
    /// Create a station id from a short identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extract the short identifier from a qualified upstream id.
    pub fn from_upstream(qualified: &str) -> Self {
        let short = qualified.rsplit(':').next().unwrap_or(qualified);
        Self(short.to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
