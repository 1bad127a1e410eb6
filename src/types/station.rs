//! Defines the metro station record as handed over by the station store, plus the
//! point type used to index active stations in an `rstar` R-tree.

use crate::types::coordinate::Coordinate;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Construction stage of a metro station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationStatus {
    Planned,
    UnderConstruction,
    Operational,
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StationStatus::Planned => "planned",
            StationStatus::UnderConstruction => "under_construction",
            StationStatus::Operational => "operational",
        };
        f.write_str(label)
    }
}

/// A single metro station.
///
/// Stations with `active == false` stay addressable by id (for display) but are
/// ignored by every distance computation of [`crate::StationIndex`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Unique station identifier within a snapshot.
    pub id: String,
    /// Display name (e.g. "Venizelou").
    pub name: String,
    /// Location of the station entrance.
    pub coordinate: Coordinate,
    /// Whether the station takes part in proximity computations.
    #[serde(alias = "isActive", alias = "is_active")]
    pub active: bool,
    pub status: StationStatus,
}

impl Station {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinate: Coordinate,
        active: bool,
        status: StationStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            active,
            status,
        }
    }
}

// --- R-Tree Implementations ---

/// An active station's position in the R-tree, pointing back into the snapshot
/// by its insertion index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StationPoint {
    pub(crate) position: usize,
    pub(crate) point: [f64; 2],
}

impl RTreeObject for StationPoint {
    type Envelope = AABB<[f64; 2]>;

    /// A station is a point, so its envelope is a degenerate AABB at `[lat, lon]`.
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StationPoint {
    /// Squared Euclidean distance in degree space. Only used by the tree for
    /// envelope pruning; real distances always go through haversine.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_store_record() {
        let json = r#"{
            "id": "venizelou",
            "name": "Venizelou",
            "coordinate": {"lat": 40.6363, "lng": 22.9386},
            "isActive": true,
            "status": "under_construction"
        }"#;
        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.id, "venizelou");
        assert!(station.active);
        assert_eq!(station.status, StationStatus::UnderConstruction);
        assert_eq!(station.status.to_string(), "under_construction");
    }

    #[test]
    fn point_envelope_is_degenerate() {
        let p = StationPoint {
            position: 3,
            point: [40.0, 22.0],
        };
        assert_eq!(p.envelope(), AABB::from_point([40.0, 22.0]));
        assert_eq!(p.distance_2(&[43.0, 26.0]), 25.0);
    }
}
