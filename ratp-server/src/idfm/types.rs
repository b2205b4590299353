//! Transit API response types.

use serde::{Deserialize, Serialize};

use crate::domain::StationId;

/// A stop area served by a line, as listed by the `stops` endpoint.
///
/// Only `id` and `name` are interpreted; every other attribute is kept
/// as-is so responses can be passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Qualified upstream id, e.g. `stop_area:IDFM:71264`
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl StationRecord {
    /// Create a record without extra attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: serde_json::Map::new(),
        }
    }

    /// Short station id used in station-scoped URLs.
    pub fn station_id(&self) -> StationId {
        StationId::from_upstream(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_extra_attributes() {
        let json = r#"{"id": "stop_area:IDFM:71264", "name": "Châtelet", "x": 2.347, "type": "StopArea"}"#;
        let record: StationRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.name, "Châtelet");
        assert_eq!(record.station_id().as_str(), "71264");
        assert_eq!(record.attributes["type"], "StopArea");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["x"], 2.347);
        assert_eq!(back["id"], "stop_area:IDFM:71264");
    }

    #[test]
    fn name_is_required() {
        let json = r#"{"id": "stop_area:IDFM:71264"}"#;
        assert!(serde_json::from_str::<StationRecord>(json).is_err());
    }
}
