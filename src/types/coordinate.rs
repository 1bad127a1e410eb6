use serde::{Deserialize, Serialize};

/// A geographical point in decimal degrees.
///
/// Values are not validated; a coordinate outside `[-90, 90]` / `[-180, 180]`
/// simply produces whatever the haversine formula yields for it.
///
/// # Examples
///
/// ```
/// use metronearby::Coordinate;
///
/// let venizelou = Coordinate::new(40.6363, 22.9386);
/// assert_eq!(venizelou.latitude, 40.6363);
/// assert_eq!(Coordinate::from((40.6363, 22.9386)), venizelou);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees (positive for North, negative for South).
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `[latitude, longitude]`, the point layout used by the station R-tree.
    pub(crate) fn as_point(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}
