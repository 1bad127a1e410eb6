use crate::types::coordinate::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A promotional offer ("deal") published by a business.
///
/// `coordinate` is the location of the owning business; offers have no location of
/// their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer<P> {
    pub id: String,
    pub business_id: String,
    pub brand: String,
    pub coordinate: Coordinate,
    pub is_active: bool,
    /// The offer is expired from this instant on.
    pub valid_until: DateTime<Utc>,
    pub payload: P,
}
