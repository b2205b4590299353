//! Line metadata records.

use serde::{Deserialize, Serialize};

/// Metadata kept for every line in a category catalog.
///
/// Serialized with the upstream field names so persisted catalogs stay
/// readable next to the reference dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Short name of the group of lines (e.g., "RER", "Noctilien").
    #[serde(rename = "shortname_groupoflines")]
    pub group_name: Option<String>,

    /// Human-readable line name (e.g., "4", "T3a", "RER B").
    #[serde(rename = "name_line")]
    pub display_name: String,

    /// Operating company.
    #[serde(rename = "operatorname")]
    pub operator_name: Option<String>,

    /// Network the line belongs to.
    #[serde(rename = "networkname")]
    pub network_name: Option<String>,
}
