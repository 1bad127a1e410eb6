//! Deployment settings for the proximity features: default listing radius,
//! registration radius and display locale.

use crate::geo_math::{DistanceLabels, DistanceLocale};
use crate::stations::station_index::StationIndex;
use crate::types::coordinate::Coordinate;
use crate::types::criteria::{validate_radius, CriteriaError, FilterCriteria, DEFAULT_RADIUS_METERS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {field}")]
    InvalidRadius {
        field: &'static str,
        #[source]
        source: CriteriaError,
    },

    #[error("Failed to parse configuration JSON")]
    JsonParse(#[from] serde_json::Error),
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_METERS
}

/// Proximity settings, usually read from the application's JSON settings.
///
/// Missing fields fall back to a 200 m radius and English labels.
///
/// # Examples
///
/// ```
/// use metronearby::{DistanceLocale, ProximityConfig};
///
/// let config = ProximityConfig::from_json_str(r#"{"registrationRadiusMeters": 350, "locale": "greek"}"#)?;
/// assert_eq!(config.default_radius_meters, 200.0);
/// assert_eq!(config.registration_radius_meters, 350.0);
/// assert_eq!(config.locale, DistanceLocale::Greek);
/// # Ok::<(), metronearby::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityConfig {
    /// Radius preselected in listing and deal filters.
    #[serde(default = "default_radius")]
    pub default_radius_meters: f64,
    /// A business may register only within this distance of an active station.
    #[serde(default = "default_radius")]
    pub registration_radius_meters: f64,
    #[serde(default)]
    pub locale: DistanceLocale,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            default_radius_meters: DEFAULT_RADIUS_METERS,
            registration_radius_meters: DEFAULT_RADIUS_METERS,
            locale: DistanceLocale::default(),
        }
    }
}

impl ProximityConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Checks both radii against the allowed range.
    pub fn validate(self) -> Result<Self, ConfigError> {
        validate_radius(self.default_radius_meters).map_err(|source| ConfigError::InvalidRadius {
            field: "defaultRadiusMeters",
            source,
        })?;
        validate_radius(self.registration_radius_meters).map_err(|source| {
            ConfigError::InvalidRadius {
                field: "registrationRadiusMeters",
                source,
            }
        })?;
        Ok(self)
    }

    pub fn labels(&self) -> DistanceLabels {
        DistanceLabels::for_locale(self.locale)
    }

    /// Criteria with the configured default radius and nothing else selected.
    pub fn default_criteria(&self) -> Result<FilterCriteria, CriteriaError> {
        FilterCriteria::builder()
            .radius_meters(self.default_radius_meters)
            .build()
    }

    /// Registration gate: whether a business at `coordinate` lies within the
    /// registration radius of at least one active station.
    pub fn is_registrable(&self, index: &StationIndex, coordinate: Coordinate) -> bool {
        index.any_within_radius(coordinate, self.registration_radius_meters)
    }
}
