//! Proximity engine for metro-station local-commerce listings: great-circle
//! distances, closest-station lookup, radius filtering of businesses and
//! nearest-station bucketing of deals.

mod config;
mod deals;
mod error;
mod geo_math;
mod proximity_filter;
mod stations;
mod types;

pub use config::{ConfigError, ProximityConfig};
pub use error::MetroNearbyError;
pub use geo_math::*;
pub use proximity_filter::ProximityFilter;

pub use deals::clock::{Clock, FixedClock, SystemClock};
pub use deals::deal_aggregator::{DealAggregator, DealSelection, StationDeals};

pub use stations::error::StationIndexError;
pub use stations::station_index::{NearestStation, StationIndex};

pub use types::coordinate::Coordinate;
pub use types::criteria::*;
pub use types::entity::{AnnotatedEntity, LocatedEntity};
pub use types::offer::Offer;
pub use types::station::{Station, StationStatus};
