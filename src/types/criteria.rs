//! Filter criteria for proximity queries and the radius bounds they must respect.

use bon::bon;
use thiserror::Error;

/// Radius used when the caller does not choose one.
pub const DEFAULT_RADIUS_METERS: f64 = 200.0;
/// Smallest radius a caller may select.
pub const MIN_RADIUS_METERS: f64 = 50.0;
/// Largest radius a caller may select.
pub const MAX_RADIUS_METERS: f64 = 1000.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CriteriaError {
    #[error("Radius {radius} m is outside the allowed range [{min}, {max}] m")]
    RadiusOutOfRange { radius: f64, min: f64, max: f64 },
}

/// Checks that `radius_meters` lies within
/// [`MIN_RADIUS_METERS`]..=[`MAX_RADIUS_METERS`] and returns it unchanged.
///
/// # Errors
///
/// Returns [`CriteriaError::RadiusOutOfRange`] for out-of-range or non-finite values.
pub fn validate_radius(radius_meters: f64) -> Result<f64, CriteriaError> {
    if radius_meters.is_finite() && (MIN_RADIUS_METERS..=MAX_RADIUS_METERS).contains(&radius_meters)
    {
        Ok(radius_meters)
    } else {
        Err(CriteriaError::RadiusOutOfRange {
            radius: radius_meters,
            min: MIN_RADIUS_METERS,
            max: MAX_RADIUS_METERS,
        })
    }
}

/// Clamps a user-supplied radius (e.g. from a slider) into the allowed range.
/// `NaN` maps to [`DEFAULT_RADIUS_METERS`].
pub fn clamp_radius(radius_meters: f64) -> f64 {
    if radius_meters.is_nan() {
        DEFAULT_RADIUS_METERS
    } else {
        radius_meters.clamp(MIN_RADIUS_METERS, MAX_RADIUS_METERS)
    }
}

/// What a listing view asks the proximity filter for.
///
/// Values are immutable: build a new one whenever the user changes a filter.
/// The builder rejects radii outside the allowed range.
///
/// # Examples
///
/// ```
/// use metronearby::FilterCriteria;
///
/// let criteria = FilterCriteria::builder()
///     .reference_station_id("venizelou")
///     .search_text("Coffee")
///     .build()
///     .unwrap();
/// assert_eq!(criteria.radius_meters(), 200.0);
/// assert_eq!(criteria.search_text(), "Coffee");
///
/// assert!(FilterCriteria::builder().radius_meters(5000.0).build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    reference_station_id: Option<String>,
    radius_meters: f64,
    search_text: String,
    category_id: Option<String>,
}

#[bon]
impl FilterCriteria {
    #[builder]
    pub fn new(
        #[builder(into)] reference_station_id: Option<String>,
        #[builder(default = DEFAULT_RADIUS_METERS)] radius_meters: f64,
        #[builder(default, into)] search_text: String,
        #[builder(into)] category_id: Option<String>,
    ) -> Result<Self, CriteriaError> {
        let radius_meters = validate_radius(radius_meters)?;
        Ok(Self {
            reference_station_id,
            radius_meters,
            search_text,
            category_id,
        })
    }

    pub fn reference_station_id(&self) -> Option<&str> {
        self.reference_station_id.as_deref()
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            reference_station_id: None,
            radius_meters: DEFAULT_RADIUS_METERS,
            search_text: String::new(),
            category_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = FilterCriteria::builder().build().unwrap();
        assert_eq!(built, FilterCriteria::default());
        assert_eq!(built.reference_station_id(), None);
        assert_eq!(built.category_id(), None);
    }

    #[test]
    fn radius_bounds_are_inclusive() {
        assert_eq!(validate_radius(50.0), Ok(50.0));
        assert_eq!(validate_radius(1000.0), Ok(1000.0));
        assert!(validate_radius(49.99).is_err());
        assert!(validate_radius(1000.01).is_err());
        assert!(validate_radius(f64::NAN).is_err());
        assert!(validate_radius(f64::INFINITY).is_err());
        assert!(validate_radius(-200.0).is_err());
    }

    #[test]
    fn builder_rejects_out_of_range_radius() {
        let err = FilterCriteria::builder()
            .radius_meters(20.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CriteriaError::RadiusOutOfRange {
                radius: 20.0,
                min: MIN_RADIUS_METERS,
                max: MAX_RADIUS_METERS,
            }
        );
    }

    #[test]
    fn clamp_keeps_values_in_range() {
        assert_eq!(clamp_radius(10.0), 50.0);
        assert_eq!(clamp_radius(350.0), 350.0);
        assert_eq!(clamp_radius(5000.0), 1000.0);
        assert_eq!(clamp_radius(f64::NAN), DEFAULT_RADIUS_METERS);
    }
}
