//! The shared listing filter: text and category filtering, radius filtering around a
//! selected station, and closest-station annotation for every result.

use crate::geo_math::distance_meters;
use crate::stations::station_index::StationIndex;
use crate::types::criteria::FilterCriteria;
use crate::types::entity::{AnnotatedEntity, LocatedEntity};
use crate::types::station::Station;

/// Filters and annotates located entities against a [`StationIndex`] snapshot.
///
/// # Examples
///
/// ```
/// use metronearby::{Coordinate, FilterCriteria, LocatedEntity, ProximityFilter, Station, StationIndex, StationStatus};
///
/// let index = StationIndex::new(vec![
///     Station::new("venizelou", "Venizelou", Coordinate::new(40.6363, 22.9386), true, StationStatus::Operational),
/// ])?;
/// let shops = vec![
///     LocatedEntity::new("bakery", Coordinate::new(40.6360, 22.9390), ()).with_search_text("Bakery"),
///     LocatedEntity::new("far", Coordinate::new(40.6500, 22.9600), ()).with_search_text("Far away"),
/// ];
///
/// let criteria = FilterCriteria::builder().reference_station_id("venizelou").build()?;
/// let results = ProximityFilter::new(&index).apply(&shops, &criteria);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].entity.id, "bakery");
/// assert_eq!(results[0].closest_station_id.as_deref(), Some("venizelou"));
/// # Ok::<(), metronearby::MetroNearbyError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProximityFilter<'a> {
    index: &'a StationIndex,
}

impl<'a> ProximityFilter<'a> {
    pub fn new(index: &'a StationIndex) -> Self {
        Self { index }
    }

    /// Runs the text, category and station/radius filters in that order.
    ///
    /// With a resolvable reference station, survivors are those within
    /// `criteria.radius_meters()` (inclusive), stably sorted by distance and annotated
    /// with it. An unknown or inactive reference station counts as no selection: all
    /// entities pass in their original order with `distance_meters == None`.
    /// Every result carries its own closest active station.
    pub fn apply<P: Clone>(
        &self,
        entities: &[LocatedEntity<P>],
        criteria: &FilterCriteria,
    ) -> Vec<AnnotatedEntity<P>> {
        let query = criteria.search_text().to_lowercase();
        let matching = entities
            .iter()
            .filter(|entity| query.is_empty() || entity.search_text.contains(&query))
            .filter(|entity| {
                criteria
                    .category_id()
                    .map_or(true, |category| entity.category_id.as_deref() == Some(category))
            });

        let reference = criteria
            .reference_station_id()
            .and_then(|station_id| self.reference_station(station_id));

        let selected: Vec<(&LocatedEntity<P>, Option<f64>)> = match reference {
            Some(station) => {
                let mut in_range: Vec<(&LocatedEntity<P>, f64)> = matching
                    .filter_map(|entity| {
                        let dist = distance_meters(entity.coordinate, station.coordinate);
                        (dist <= criteria.radius_meters()).then_some((entity, dist))
                    })
                    .collect();
                // sort_by is stable: equal distances keep their input order.
                in_range.sort_by(|a, b| a.1.total_cmp(&b.1));
                in_range
                    .into_iter()
                    .map(|(entity, dist)| (entity, Some(dist)))
                    .collect()
            }
            None => matching.map(|entity| (entity, None)).collect(),
        };

        selected
            .into_iter()
            .map(|(entity, distance_meters)| AnnotatedEntity {
                entity: entity.clone(),
                distance_meters,
                closest_station_id: self.closest_station_id(entity),
            })
            .collect()
    }

    /// Annotates every entity with its closest active station and the distance to it,
    /// without filtering or reordering. Used for map markers.
    pub fn annotate<P: Clone>(&self, entities: &[LocatedEntity<P>]) -> Vec<AnnotatedEntity<P>> {
        entities
            .iter()
            .map(|entity| {
                let nearest = self.index.nearest(entity.coordinate);
                AnnotatedEntity {
                    entity: entity.clone(),
                    distance_meters: nearest.as_ref().map(|n| n.distance_meters),
                    closest_station_id: nearest.map(|n| n.station_id),
                }
            })
            .collect()
    }

    fn reference_station(&self, station_id: &str) -> Option<&'a Station> {
        let station = self.index.active_station(station_id);
        if station.is_none() {
            log::debug!(
                "Reference station '{}' is unknown or inactive, skipping radius filter",
                station_id
            );
        }
        station
    }

    fn closest_station_id<P>(&self, entity: &LocatedEntity<P>) -> Option<String> {
        self.index
            .nearest(entity.coordinate)
            .map(|nearest| nearest.station_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::coordinate::Coordinate;
    use crate::types::station::StationStatus;

    #[derive(Debug, Clone, PartialEq)]
    struct Shop {
        name: &'static str,
    }

    fn index() -> StationIndex {
        StationIndex::new(vec![
            Station::new("a", "Venizelou", Coordinate::new(40.6363, 22.9386), true, StationStatus::Operational),
            Station::new("b", "Agia Sofia", Coordinate::new(40.6334, 22.9415), true, StationStatus::Operational),
            Station::new("closed", "Depot", Coordinate::new(40.6400, 22.9300), false, StationStatus::Planned),
        ])
        .unwrap()
    }

    fn shop(id: &str, lat: f64, lon: f64, name: &'static str, category: &str) -> LocatedEntity<Shop> {
        LocatedEntity::new(id, Coordinate::new(lat, lon), Shop { name })
            .with_search_text(name)
            .with_category(category)
    }

    fn shops() -> Vec<LocatedEntity<Shop>> {
        vec![
            shop("far", 40.6420, 22.9480, "Ouzeri Far", "food"),
            shop("near-b", 40.6340, 22.9410, "Coffee Island", "coffee"),
            shop("near-a", 40.6360, 22.9390, "Bougatsa Giannis", "food"),
            shop("mid", 40.6350, 22.9400, "Coffee Lab", "coffee"),
        ]
    }

    fn criteria() -> FilterCriteria {
        FilterCriteria::default()
    }

    #[test]
    fn no_reference_station_passes_everything_through() {
        let index = index();
        let input = shops();
        let results = ProximityFilter::new(&index).apply(&input, &criteria());

        let ids: Vec<&str> = results.iter().map(|r| r.entity.id.as_str()).collect();
        assert_eq!(ids, vec!["far", "near-b", "near-a", "mid"]);
        assert!(results.iter().all(|r| r.distance_meters.is_none()));
        assert!(results.iter().zip(&input).all(|(r, e)| r.entity == *e));
    }

    #[test]
    fn closest_station_is_always_annotated() {
        let index = index();
        let results = ProximityFilter::new(&index).apply(&shops(), &criteria());
        for result in &results {
            let expected = index.nearest(result.entity.coordinate).map(|n| n.station_id);
            assert_eq!(result.closest_station_id, expected);
            assert_ne!(result.closest_station_id.as_deref(), Some("closed"));
        }
    }

    #[test]
    fn radius_filter_sorts_by_distance_and_annotates() {
        let index = index();
        let criteria = FilterCriteria::builder()
            .reference_station_id("a")
            .radius_meters(500.0)
            .build()
            .unwrap();
        let results = ProximityFilter::new(&index).apply(&shops(), &criteria);

        let station_a = Coordinate::new(40.6363, 22.9386);
        let mut expected: Vec<(f64, String)> = shops()
            .into_iter()
            .map(|s| (distance_meters(s.coordinate, station_a), s.id))
            .filter(|(d, _)| *d <= 500.0)
            .collect();
        expected.sort_by(|a, b| a.0.total_cmp(&b.0));

        let got: Vec<(f64, String)> = results
            .iter()
            .map(|r| (r.distance_meters.unwrap(), r.entity.id.clone()))
            .collect();
        assert_eq!(got, expected);
        assert!(!got.iter().any(|(_, id)| id == "far"));
        assert_eq!(got[0].1, "near-a");
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let index = index();
        let input = shops();
        let station_a = Coordinate::new(40.6363, 22.9386);
        let boundary = distance_meters(input[3].coordinate, station_a);
        assert!((50.0..=1000.0).contains(&boundary));

        let at = FilterCriteria::builder()
            .reference_station_id("a")
            .radius_meters(boundary)
            .build()
            .unwrap();
        let results = ProximityFilter::new(&index).apply(&input, &at);
        assert!(results.iter().any(|r| r.entity.id == "mid"));
        assert!(results
            .iter()
            .all(|r| r.distance_meters.unwrap() <= boundary));

        let just_below = FilterCriteria::builder()
            .reference_station_id("a")
            .radius_meters(boundary - 1e-6)
            .build()
            .unwrap();
        let results = ProximityFilter::new(&index).apply(&input, &just_below);
        assert!(!results.iter().any(|r| r.entity.id == "mid"));
    }

    #[test]
    fn default_radius_excludes_entities_beyond_200m() {
        let index = index();
        let criteria = FilterCriteria::builder().reference_station_id("a").build().unwrap();
        let results = ProximityFilter::new(&index).apply(&shops(), &criteria);
        let station_a = Coordinate::new(40.6363, 22.9386);
        for s in shops() {
            let d = distance_meters(s.coordinate, station_a);
            let kept = results.iter().any(|r| r.entity.id == s.id);
            assert_eq!(kept, d <= 200.0, "{} at {d} m", s.id);
        }
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let index = index();
        let spot = Coordinate::new(40.6360, 22.9390);
        let input = vec![
            LocatedEntity::new("first", spot, ()),
            LocatedEntity::new("second", spot, ()),
            LocatedEntity::new("third", spot, ()),
        ];
        let criteria = FilterCriteria::builder().reference_station_id("a").build().unwrap();
        let ids: Vec<String> = ProximityFilter::new(&index)
            .apply(&input, &criteria)
            .into_iter()
            .map(|r| r.entity.id)
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn unknown_or_inactive_reference_means_no_radius_filter() {
        let index = index();
        for station_id in ["nowhere", "closed"] {
            let criteria = FilterCriteria::builder()
                .reference_station_id(station_id)
                .build()
                .unwrap();
            let results = ProximityFilter::new(&index).apply(&shops(), &criteria);
            assert_eq!(results.len(), 4);
            assert!(results.iter().all(|r| r.distance_meters.is_none()));
        }
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let index = index();
        let criteria = FilterCriteria::builder().search_text("COFFEE").build().unwrap();
        let ids: Vec<String> = ProximityFilter::new(&index)
            .apply(&shops(), &criteria)
            .into_iter()
            .map(|r| r.entity.id)
            .collect();
        assert_eq!(ids, vec!["near-b", "mid"]);

        let none = FilterCriteria::builder().search_text("souvlaki").build().unwrap();
        assert!(ProximityFilter::new(&index).apply(&shops(), &none).is_empty());
    }

    #[test]
    fn category_filter_combines_with_radius() {
        let index = index();
        let criteria = FilterCriteria::builder()
            .category_id("food")
            .reference_station_id("a")
            .radius_meters(1000.0)
            .build()
            .unwrap();
        let results = ProximityFilter::new(&index).apply(&shops(), &criteria);
        assert!(results
            .iter()
            .all(|r| r.entity.category_id.as_deref() == Some("food")));
        assert!(results.iter().any(|r| r.entity.id == "near-a"));
        assert_eq!(results[0].entity.payload.name, "Bougatsa Giannis");
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let index = index();
        let input = shops();
        let snapshot = input.clone();
        let criteria = FilterCriteria::builder()
            .reference_station_id("b")
            .radius_meters(300.0)
            .build()
            .unwrap();
        let filter = ProximityFilter::new(&index);
        let first = filter.apply(&input, &criteria);
        let second = filter.apply(&input, &criteria);
        assert_eq!(first, second);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn empty_station_set_leaves_closest_unset() {
        let index = StationIndex::new(vec![]).unwrap();
        let results = ProximityFilter::new(&index).apply(&shops(), &criteria());
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.closest_station_id.is_none()));
    }

    #[test]
    fn annotate_reports_distance_to_closest_station() {
        let index = index();
        let annotated = ProximityFilter::new(&index).annotate(&shops());
        assert_eq!(annotated.len(), 4);
        for a in &annotated {
            let nearest = index.nearest(a.entity.coordinate).unwrap();
            assert_eq!(a.closest_station_id.as_deref(), Some(nearest.station_id.as_str()));
            assert_eq!(a.distance_meters, Some(nearest.distance_meters));
        }
    }
}
