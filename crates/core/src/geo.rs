//! Coordinates and great-circle distance.
//!
//! Donation distances are computed with the haversine formula between the
//! caller's reference point and the donor's stored coordinates. There is no
//! spatial index; every distance is computed in memory per request.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per statute mile.
const KM_PER_MILE: f64 = 1.609_344;

// ---------------------------------------------------------------------------
// GeoPoint
// ---------------------------------------------------------------------------

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a point, rejecting values outside the valid degree ranges.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::Validation(format!(
                "latitude must be between -90 and 90, got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::Validation(format!(
                "longitude must be between -180 and 180, got {longitude}"
            )));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Combine optional coordinate halves.
    ///
    /// Both absent yields `Ok(None)`; exactly one present is an error.
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, CoreError> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Self::try_new(lat, lng).map(Some),
            (None, None) => Ok(None),
            _ => Err(CoreError::Validation(
                "latitude and longitude must be provided together".to_string(),
            )),
        }
    }

    /// Haversine distance in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Haversine distance in statute miles.
    pub fn distance_miles(&self, other: &GeoPoint) -> f64 {
        self.distance_km(other) / KM_PER_MILE
    }
}

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// Unit label attached to a display distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Miles,
}

impl DistanceUnit {
    pub fn label(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "miles",
        }
    }
}

/// A display distance: a numeric value plus its unit.
///
/// `value` keeps full precision for sorting; [`Distance::rounded`] and the
/// `Display` impl use one decimal place for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn miles(value: f64) -> Self {
        Self {
            value,
            unit: DistanceUnit::Miles,
        }
    }

    /// Distance between two points in miles.
    pub fn between(from: &GeoPoint, to: &GeoPoint) -> Self {
        Self::miles(from.distance_miles(to))
    }

    /// The value rounded to one decimal place.
    pub fn rounded(&self) -> f64 {
        (self.value * 10.0).round() / 10.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} {}", self.value, self.unit.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
