//! Deal selection: expiry filtering, nearest-station bucketing and brand facets for
//! the deal tables and cards.

use crate::deals::clock::{Clock, SystemClock};
use crate::stations::station_index::StationIndex;
use crate::types::criteria::{validate_radius, CriteriaError, DEFAULT_RADIUS_METERS};
use crate::types::offer::Offer;
use bon::bon;
use std::collections::{HashMap, HashSet};

/// Offers whose owning business is closest to one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDeals<P> {
    pub station_id: String,
    pub station_name: String,
    pub offers: Vec<Offer<P>>,
}

/// Result of [`DealAggregator::select`] for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DealSelection<P> {
    /// Active, unexpired offers matching the station and brand facets.
    pub offers: Vec<Offer<P>>,
    /// Brands available among all active, unexpired offers, for the brand control.
    pub brands: Vec<String>,
}

/// Groups and filters offers by their business's closest station and by brand.
///
/// Deals use nearest-station bucketing: an offer belongs to a station only if that
/// station is the closest active one to the business, not merely within range.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use metronearby::{Coordinate, DealAggregator, FixedClock, Offer, Station, StationIndex, StationStatus};
///
/// let index = StationIndex::new(vec![
///     Station::new("venizelou", "Venizelou", Coordinate::new(40.6363, 22.9386), true, StationStatus::Operational),
/// ])?;
/// let now = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap();
/// let offer = Offer {
///     id: "o1".to_string(),
///     business_id: "bakery".to_string(),
///     brand: "Bougatsa Giannis".to_string(),
///     coordinate: Coordinate::new(40.6360, 22.9390),
///     is_active: true,
///     valid_until: now + Duration::days(3),
///     payload: (),
/// };
///
/// let deals = DealAggregator::new(&index, FixedClock(now));
/// let selection = deals
///     .select()
///     .offers(&[offer])
///     .reference_station_id("venizelou")
///     .call()?;
/// assert_eq!(selection.offers.len(), 1);
/// assert_eq!(selection.brands, vec!["Bougatsa Giannis".to_string()]);
/// # Ok::<(), metronearby::MetroNearbyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DealAggregator<'a, C = SystemClock> {
    index: &'a StationIndex,
    clock: C,
}

#[bon]
impl<'a, C: Clock> DealAggregator<'a, C> {
    pub fn new(index: &'a StationIndex, clock: C) -> Self {
        Self { index, clock }
    }

    /// Offers that are active and whose `valid_until` lies strictly after now.
    pub fn active_unexpired<P: Clone>(&self, offers: &[Offer<P>]) -> Vec<Offer<P>> {
        let now = self.clock.now();
        offers
            .iter()
            .filter(|offer| offer.is_active && offer.valid_until > now)
            .cloned()
            .collect()
    }

    /// Keeps offers whose closest active station is `reference_station_id` and lies
    /// within `radius_meters`, then those whose brand equals `brand_filter`
    /// ignoring case. Unset (or unknown/inactive station, blank brand) facets do not
    /// filter. Input order is kept.
    pub fn filter_by_station_and_brand<P: Clone>(
        &self,
        offers: &[Offer<P>],
        reference_station_id: Option<&str>,
        brand_filter: Option<&str>,
        radius_meters: f64,
    ) -> Vec<Offer<P>> {
        let station_id = reference_station_id.filter(|id| {
            let known = self.index.active_station(id).is_some();
            if !known {
                log::debug!(
                    "Deal station filter '{}' is unknown or inactive, ignoring it",
                    id
                );
            }
            known
        });
        let brand = brand_filter
            .filter(|brand| !brand.trim().is_empty())
            .map(str::to_lowercase);

        offers
            .iter()
            .filter(|offer| {
                station_id.map_or(true, |station_id| {
                    self.index
                        .nearest(offer.coordinate)
                        .is_some_and(|nearest| {
                            nearest.station_id == station_id
                                && nearest.distance_meters <= radius_meters
                        })
                })
            })
            .filter(|offer| {
                brand
                    .as_deref()
                    .map_or(true, |brand| offer.brand.to_lowercase() == brand)
            })
            .cloned()
            .collect()
    }

    /// Distinct, lexicographically sorted brand names of `offers`, skipping blanks.
    ///
    /// Brands differing only in case are one entry (the brand filter ignores case);
    /// the first spelling encountered is kept.
    pub fn available_brands<P>(offers: &[Offer<P>]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut brands: Vec<String> = offers
            .iter()
            .map(|offer| offer.brand.as_str())
            .filter(|brand| !brand.trim().is_empty())
            .filter(|brand| seen.insert(brand.to_lowercase()))
            .map(str::to_string)
            .collect();
        brands.sort();
        brands
    }

    /// Buckets offers under their closest active station, dropping offers farther
    /// than `radius_meters` from it. Groups follow the station snapshot order and
    /// stations without offers are left out.
    pub fn group_by_closest_station<P: Clone>(
        &self,
        offers: &[Offer<P>],
        radius_meters: f64,
    ) -> Vec<StationDeals<P>> {
        let mut buckets: HashMap<String, Vec<Offer<P>>> = HashMap::new();
        for offer in offers {
            if let Some(nearest) = self.index.nearest(offer.coordinate) {
                if nearest.distance_meters <= radius_meters {
                    buckets
                        .entry(nearest.station_id)
                        .or_default()
                        .push(offer.clone());
                }
            }
        }

        self.index
            .iter()
            .filter_map(|station| {
                buckets.remove(&station.id).map(|offers| StationDeals {
                    station_id: station.id.clone(),
                    station_name: station.name.clone(),
                    offers,
                })
            })
            .collect()
    }

    /// Runs the whole deal pipeline for one request: active/unexpired offers, the
    /// brands among them, then the station and brand facets.
    ///
    /// # Arguments
    ///
    /// * `.offers(&[Offer<P>])`: **Required.** All offers known to the caller.
    /// * `.reference_station_id(&str)`: Optional selected station.
    /// * `.brand(&str)`: Optional selected brand.
    /// * `.radius_meters(f64)`: Optional. Defaults to `200.0`.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::RadiusOutOfRange`] for a radius outside `[50, 1000]` m.
    #[builder]
    pub fn select<P: Clone>(
        &self,
        offers: &[Offer<P>],
        reference_station_id: Option<&str>,
        brand: Option<&str>,
        #[builder(default = DEFAULT_RADIUS_METERS)] radius_meters: f64,
    ) -> Result<DealSelection<P>, CriteriaError> {
        let radius_meters = validate_radius(radius_meters)?;
        let active = self.active_unexpired(offers);
        let brands = Self::available_brands(&active);
        let offers =
            self.filter_by_station_and_brand(&active, reference_station_id, brand, radius_meters);
        Ok(DealSelection { offers, brands })
    }
}
