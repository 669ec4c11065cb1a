//! Shared query parameter types for API handlers.

use std::str::FromStr;

use foodshare_core::discovery::DiscoveryQuery;
use foodshare_core::geo::GeoPoint;
use serde::Deserialize;

/// Query parameters for `GET /donations`
/// (`?category=&q=&sort=&lat=&lng=&max_distance=&limit=`).
///
/// Every field is optional and malformed values degrade to defaults rather
/// than failing the request. Numbers arrive as text so that `lat=abc`
/// drops the location instead of rejecting the whole query string.
#[derive(Debug, Default, Deserialize)]
pub struct DiscoveryParams {
    pub category: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub max_distance: Option<String>,
    pub limit: Option<String>,
}

impl DiscoveryParams {
    /// The caller's position, if both halves are present, numeric and in
    /// range.
    pub fn reference_point(&self) -> Option<GeoPoint> {
        let lat = lenient("lat", self.lat.as_deref());
        let lng = lenient("lng", self.lng.as_deref());
        match GeoPoint::from_parts(lat, lng) {
            Ok(point) => point,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable reference coordinates");
                None
            }
        }
    }

    /// Resolve into a discovery query.
    ///
    /// `default_radius` applies only when the caller sent a location and no
    /// explicit `max_distance`.
    pub fn to_query(&self, default_radius: Option<f64>) -> DiscoveryQuery {
        let explicit = lenient::<f64>("max_distance", self.max_distance.as_deref());
        let radius = match (explicit, self.reference_point()) {
            (Some(explicit), _) => Some(explicit),
            (None, Some(_)) => default_radius,
            (None, None) => None,
        };

        let mut query = DiscoveryQuery::from_raw(
            self.category.as_deref(),
            self.q.as_deref(),
            self.sort.as_deref(),
            radius,
        );
        if let Some(limit) = lenient::<usize>("limit", self.limit.as_deref()) {
            query = query.with_limit(limit);
        }

        if self.category.is_some() && query.category.is_none() {
            tracing::debug!(category = ?self.category, "Category filter not applied");
        }
        if let Some(sort) = self.sort.as_deref() {
            if !sort.trim().eq_ignore_ascii_case(query.sort_key.as_str()) {
                tracing::debug!(sort, "Unknown sort key, using default");
            }
        }

        query
    }
}

/// Parse an optional numeric parameter, treating blank or malformed text
/// as absent.
fn lenient<T: FromStr>(name: &'static str, raw: Option<&str>) -> Option<T> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!(param = name, value = raw, "Ignoring malformed numeric parameter");
            None
        }
    }
}

/// Query parameters for `GET /users` (`?active=true|false`).
#[derive(Debug, Deserialize)]
pub struct ActiveParams {
    pub active: Option<bool>,
}
