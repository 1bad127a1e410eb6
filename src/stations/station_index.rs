use crate::geo_math::{distance_meters, EARTH_RADIUS_METERS};
use crate::stations::error::StationIndexError;
use crate::types::coordinate::Coordinate;
use crate::types::station::{Station, StationPoint};
use ordered_float::OrderedFloat;
use rstar::RTree;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::f64::consts::FRAC_PI_2;
use std::path::Path;

// Widens the R-tree search circle slightly so float noise never drops a station
// that haversine places exactly on the radius.
const SEARCH_MARGIN: f64 = 1.0001;

/// A station matched by a proximity lookup, with its distance to the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestStation {
    pub station_id: String,
    pub name: String,
    pub distance_meters: f64,
}

/// Read-only snapshot of all stations, answering nearest-station and radius queries.
///
/// Built once per station-set change and discarded, never patched. Only active
/// stations take part in distance computations; inactive ones can still be looked
/// up with [`StationIndex::get`].
///
/// # Examples
///
/// ```
/// use metronearby::{Coordinate, Station, StationIndex, StationStatus};
///
/// let index = StationIndex::new(vec![
///     Station::new("venizelou", "Venizelou", Coordinate::new(40.6363, 22.9386), true, StationStatus::Operational),
///     Station::new("agia-sofia", "Agia Sofia", Coordinate::new(40.6334, 22.9415), true, StationStatus::Operational),
/// ])?;
///
/// let nearest = index.nearest(Coordinate::new(40.6362, 22.9387)).unwrap();
/// assert_eq!(nearest.station_id, "venizelou");
/// assert!(index.within_radius(Coordinate::new(40.6362, 22.9387), "venizelou", 200.0));
/// assert!(!index.within_radius(Coordinate::new(40.6362, 22.9387), "unknown", 200.0));
/// # Ok::<(), metronearby::StationIndexError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StationIndex {
    stations: Vec<Station>,
    positions: HashMap<String, usize>,
    rtree: RTree<StationPoint>,
}

// Heap entry for ranked lookups; index order breaks distance ties.
#[derive(PartialEq, Eq)]
struct StationCandidate {
    distance_meters: OrderedFloat<f64>,
    position: usize,
}

impl PartialOrd for StationCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StationCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_meters
            .cmp(&other.distance_meters)
            .then(self.position.cmp(&other.position))
    }
}

impl StationIndex {
    /// Builds a snapshot, preserving the order of `stations`.
    ///
    /// # Errors
    ///
    /// Returns [`StationIndexError::DuplicateId`] if two stations share an id.
    pub fn new(stations: Vec<Station>) -> Result<Self, StationIndexError> {
        let mut positions = HashMap::with_capacity(stations.len());
        for (position, station) in stations.iter().enumerate() {
            if positions.insert(station.id.clone(), position).is_some() {
                log::warn!("Station snapshot rejected: id '{}' appears twice", station.id);
                return Err(StationIndexError::DuplicateId(station.id.clone()));
            }
        }

        let points: Vec<StationPoint> = stations
            .iter()
            .enumerate()
            .filter(|(_, station)| station.active)
            .map(|(position, station)| StationPoint {
                position,
                point: station.coordinate.as_point(),
            })
            .collect();
        log::debug!(
            "Indexed {} stations ({} active)",
            stations.len(),
            points.len()
        );

        Ok(Self {
            stations,
            positions,
            rtree: RTree::bulk_load(points),
        })
    }

    /// Parses a JSON array of stations (the station store's export format).
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, StationIndexError> {
        let stations = serde_json::from_slice::<Vec<Station>>(bytes)?;
        Self::new(stations)
    }

    pub fn from_json_str(json: &str) -> Result<Self, StationIndexError> {
        Self::from_json_slice(json.as_bytes())
    }

    /// Loads a snapshot from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, StationIndexError> {
        let bytes = std::fs::read(path)
            .map_err(|e| StationIndexError::SnapshotRead(path.to_path_buf(), e))?;
        Self::from_json_slice(&bytes)
    }

    /// Any station by id, active or not.
    pub fn get(&self, station_id: &str) -> Option<&Station> {
        self.positions
            .get(station_id)
            .map(|&position| &self.stations[position])
    }

    /// The station with this id, if it exists and is active.
    pub fn active_station(&self, station_id: &str) -> Option<&Station> {
        self.get(station_id).filter(|station| station.active)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.rtree.size()
    }

    fn active_stations(&self) -> impl Iterator<Item = (usize, &Station)> {
        self.stations
            .iter()
            .enumerate()
            .filter(|(_, station)| station.active)
    }

    /// The closest active station to `coordinate`.
    ///
    /// Scans every active station; on equal distances the station that comes first
    /// in the snapshot wins. Returns `None` when there are no active stations.
    pub fn nearest(&self, coordinate: Coordinate) -> Option<NearestStation> {
        let mut best: Option<(&Station, f64)> = None;
        for (_, station) in self.active_stations() {
            let dist = distance_meters(coordinate, station.coordinate);
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((station, dist));
            }
        }
        best.map(|(station, dist)| Self::to_nearest(station, dist))
    }

    /// Up to `n` closest active stations, closest first.
    pub fn nearest_n(&self, coordinate: Coordinate, n: usize) -> Vec<NearestStation> {
        if n == 0 {
            return vec![];
        }

        let mut heap: BinaryHeap<StationCandidate> = BinaryHeap::with_capacity(n + 1);
        for (position, station) in self.active_stations() {
            let candidate = StationCandidate {
                distance_meters: OrderedFloat(distance_meters(coordinate, station.coordinate)),
                position,
            };
            if heap.len() < n {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|c| Self::to_nearest(&self.stations[c.position], c.distance_meters.into_inner()))
            .collect()
    }

    /// True iff `station_id` names an active station no further than `radius_meters`
    /// from `coordinate`. Unknown or inactive ids give `false`.
    pub fn within_radius(&self, coordinate: Coordinate, station_id: &str, radius_meters: f64) -> bool {
        self.active_station(station_id)
            .is_some_and(|station| distance_meters(coordinate, station.coordinate) <= radius_meters)
    }

    /// All active stations within `radius_meters` of `coordinate`, closest first.
    ///
    /// Candidates come from the R-tree; the haversine distance decides membership.
    pub fn stations_within(&self, coordinate: Coordinate, radius_meters: f64) -> Vec<NearestStation> {
        if radius_meters.is_nan() || radius_meters < 0.0 {
            return vec![];
        }

        let mut candidates: Vec<usize> = match search_radius_degrees(coordinate, radius_meters) {
            Some(radius_deg) => self
                .rtree
                .locate_within_distance(coordinate.as_point(), radius_deg * radius_deg)
                .map(|p| p.position)
                .collect(),
            // Cap touches a pole or the antimeridian: degree space can't bound it.
            None => self.active_stations().map(|(position, _)| position).collect(),
        };
        candidates.sort_unstable();

        let mut hits: Vec<NearestStation> = candidates
            .into_iter()
            .filter_map(|position| {
                let station = &self.stations[position];
                let dist = distance_meters(coordinate, station.coordinate);
                (dist <= radius_meters).then(|| Self::to_nearest(station, dist))
            })
            .collect();
        hits.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
        hits
    }

    /// Whether `coordinate` lies within `radius_meters` of at least one active station.
    pub fn any_within_radius(&self, coordinate: Coordinate, radius_meters: f64) -> bool {
        !self.stations_within(coordinate, radius_meters).is_empty()
    }

    fn to_nearest(station: &Station, distance_meters: f64) -> NearestStation {
        NearestStation {
            station_id: station.id.clone(),
            name: station.name.clone(),
            distance_meters,
        }
    }
}

/// Radius, in degree space, of a circle around `center` that contains every point
/// within `radius_meters` great-circle distance. `None` when no such circle exists
/// without wrapping (the cap reaches a pole or crosses the antimeridian).
fn search_radius_degrees(center: Coordinate, radius_meters: f64) -> Option<f64> {
    let angular = radius_meters / EARTH_RADIUS_METERS;
    let latitude = center.latitude.to_radians();
    if !angular.is_finite() || latitude.abs() + angular >= FRAC_PI_2 {
        return None;
    }

    let sin_ratio = angular.sin() / latitude.cos();
    if sin_ratio >= 1.0 {
        return None;
    }
    let lat_extent = angular.to_degrees();
    let lon_extent = sin_ratio.asin().to_degrees();
    if center.longitude.abs() + lon_extent >= 180.0 {
        return None;
    }

    Some(lat_extent.hypot(lon_extent) * SEARCH_MARGIN)
}
