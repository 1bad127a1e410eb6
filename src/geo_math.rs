//! Great-circle distance between coordinates and the distance strings shown next to
//! businesses, map markers and deal cards.

use crate::types::coordinate::Coordinate;
use haversine::{distance, Location as HaversineLocation, Units};
use serde::{Deserialize, Serialize};

/// Mean Earth radius the distances are based on, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between `a` and `b` in meters.
///
/// Inputs are not validated. The result is symmetric and `0.0` for identical points.
///
/// # Examples
///
/// ```
/// use metronearby::{distance_meters, Coordinate};
///
/// let a = Coordinate::new(40.6363, 22.9386);
/// let b = Coordinate::new(40.6334, 22.9415);
/// assert_eq!(distance_meters(a, a), 0.0);
/// assert!((distance_meters(a, b) - distance_meters(b, a)).abs() < 1e-6);
/// ```
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let km = distance(
        HaversineLocation {
            latitude: a.latitude,
            longitude: a.longitude,
        },
        HaversineLocation {
            latitude: b.latitude,
            longitude: b.longitude,
        },
        Units::Kilometers,
    );
    km * 1000.0
}

/// Formats a distance with the default (English) labels.
///
/// # Examples
///
/// ```
/// use metronearby::format_distance;
///
/// assert_eq!(format_distance(Some(150.0)), "150m");
/// assert_eq!(format_distance(Some(1000.0)), "1.0km");
/// assert_eq!(format_distance(None), "unknown distance");
/// ```
pub fn format_distance(meters: Option<f64>) -> String {
    DistanceLabels::default().format(meters)
}

/// Display locale for distance strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceLocale {
    #[default]
    English,
    Greek,
}

/// Unit suffixes and the placeholder used by [`DistanceLabels::format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceLabels {
    pub unknown: String,
    pub meters_suffix: String,
    pub kilometers_suffix: String,
}

impl DistanceLabels {
    pub fn english() -> Self {
        Self {
            unknown: "unknown distance".to_string(),
            meters_suffix: "m".to_string(),
            kilometers_suffix: "km".to_string(),
        }
    }

    pub fn greek() -> Self {
        Self {
            unknown: "Άγνωστη απόσταση".to_string(),
            meters_suffix: "μ".to_string(),
            kilometers_suffix: "χλμ".to_string(),
        }
    }

    pub fn for_locale(locale: DistanceLocale) -> Self {
        match locale {
            DistanceLocale::English => Self::english(),
            DistanceLocale::Greek => Self::greek(),
        }
    }

    /// Renders `meters` for display.
    ///
    /// The value is rounded half away from zero first; below 1000 it is shown as whole
    /// meters, otherwise as kilometers with one decimal, again rounded half away from
    /// zero (1250 m is "1.3km"). `None` and non-finite values yield the unknown
    /// placeholder.
    pub fn format(&self, meters: Option<f64>) -> String {
        let Some(meters) = meters.filter(|m| m.is_finite()) else {
            return self.unknown.clone();
        };
        let rounded = meters.round();
        if rounded < 1000.0 {
            format!("{}{}", rounded as i64, self.meters_suffix)
        } else {
            // `{:.1}` alone would round ties to even.
            let kilometers = (rounded / 100.0).round() / 10.0;
            format!("{kilometers:.1}{}", self.kilometers_suffix)
        }
    }
}

impl Default for DistanceLabels {
    fn default() -> Self {
        Self::english()
    }
}
