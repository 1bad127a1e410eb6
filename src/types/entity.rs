use crate::types::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

/// A business (or anything else with a location) as seen by the proximity filter.
///
/// The filter only reads `coordinate`, `search_text` and `category_id`; `payload`
/// carries the caller's own record through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedEntity<P> {
    pub id: String,
    pub coordinate: Coordinate,
    /// Searchable text (name, description, address) already lowercased by the caller.
    #[serde(default)]
    pub search_text: String,
    #[serde(default)]
    pub category_id: Option<String>,
    pub payload: P,
}

impl<P> LocatedEntity<P> {
    pub fn new(id: impl Into<String>, coordinate: Coordinate, payload: P) -> Self {
        Self {
            id: id.into(),
            coordinate,
            search_text: String::new(),
            category_id: None,
            payload,
        }
    }

    /// Sets the searchable text, lowercasing it.
    pub fn with_search_text(mut self, text: &str) -> Self {
        self.search_text = text.to_lowercase();
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }
}

/// A [`LocatedEntity`] together with the proximity data derived for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedEntity<P> {
    #[serde(flatten)]
    pub entity: LocatedEntity<P>,
    /// Distance to the selected reference station; `None` when no station is selected.
    pub distance_meters: Option<f64>,
    /// Closest active station, independent of the selected reference station.
    pub closest_station_id: Option<String>,
}
