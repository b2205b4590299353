//! Upstream transport-mode normalization.

use super::Category;

/// Error returned when an upstream record carries a transport mode that has no
/// canonical category.
///
/// This aborts ingestion: skipping the record would leave the persisted
/// artifacts out of sync with each other.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode: '{0}'")]
pub struct UnknownTransportMode(pub String);

/// The upstream vocabulary mapped onto canonical categories.
const DEFAULT_MODES: [(&str, Category); 5] = [
    ("metro", Category::Metro),
    ("tram", Category::Tramway),
    ("funicular", Category::Metro),
    ("bus", Category::Bus),
    ("rail", Category::Train),
];

/// Fixed lookup table from upstream transport mode to [`Category`].
///
/// # Examples
///
/// ```
/// use ratp_server::domain::{Category, ModeTable};
///
/// let modes = ModeTable::default();
/// assert_eq!(modes.normalize("tram").unwrap(), Category::Tramway);
/// assert!(modes.normalize("cableway").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ModeTable {
    entries: Vec<(String, Category)>,
}

impl ModeTable {
    /// Create a table from explicit `(upstream mode, category)` pairs.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Category)>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(m, c)| (m.into(), c)).collect(),
        }
    }

    /// Map an upstream transport mode to its canonical category.
    pub fn normalize(&self, raw_mode: &str) -> Result<Category, UnknownTransportMode> {
        self.entries
            .iter()
            .find(|(mode, _)| mode == raw_mode)
            .map(|(_, category)| *category)
            .ok_or_else(|| UnknownTransportMode(raw_mode.to_string()))
    }

    /// Number of known upstream modes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no modes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ModeTable {
    fn default() -> Self {
        Self::new(DEFAULT_MODES)
    }
}
