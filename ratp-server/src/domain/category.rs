//! Canonical transport categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a user-supplied category is not one of the four
/// canonical ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transport category '{0}': expected one of metro, train, tramway, bus")]
pub struct InvalidCategory(pub String);

/// The system's normalized transport classification.
///
/// Every upstream transport mode maps onto exactly one of these (see
/// [`ModeTable`](super::ModeTable)). The set is closed.
///
/// # Examples
///
/// ```
/// use ratp_server::domain::Category;
///
/// let metro: Category = "metro".parse().unwrap();
/// assert_eq!(metro, Category::Metro);
/// assert_eq!(metro.as_str(), "metro");
///
/// assert!("noctilien".parse::<Category>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Metro,
    Train,
    Tramway,
    Bus,
}

impl Category {
    /// All categories, in the order artifacts are written.
    pub const ALL: [Category; 4] = [
        Category::Train,
        Category::Bus,
        Category::Metro,
        Category::Tramway,
    ];

    /// Returns the lowercase name used in URLs and artifact file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Metro => "metro",
            Category::Train => "train",
            Category::Tramway => "tramway",
            Category::Bus => "bus",
        }
    }
}

impl FromStr for Category {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metro" => Ok(Category::Metro),
            "train" => Ok(Category::Train),
            "tramway" => Ok(Category::Tramway),
            "bus" => Ok(Category::Bus),
            other => Err(InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
