//! Geo predicate builder.
//!
//! # Responsibility
//! - Turn radius or rectangle search inputs into building predicates.
//! - Own the single distance formula shared by Rust and SQL.
//!
//! # Invariants
//! - A mode activates only when all of its inputs are present.
//! - Radius and rectangle predicates are independent; both may be active.
//! - Rectangles are closed: boundary points are covered.
//! - All coordinates are WGS84 degrees (SRID 4326) on a spherical Earth.

use crate::search::compose::Condition;
use crate::search::filter::FilterSet;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Spatial reference system of every stored and queried coordinate.
pub const WGS84_SRID: u32 = 4326;
/// IUGG mean Earth radius used for great-circle distances.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

// Slack for the latitude prefilter so float rounding never drops a point
// that the exact distance check would keep.
const LATITUDE_BAND_SLACK_DEG: f64 = 1e-9;

/// Latitude/longitude pair in degrees.
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
}

/// Great-circle (haversine) distance between two points, in meters.
pub fn distance_m(from: GeoPoint, to: GeoPoint) -> f64 {
    let from_lat = from.latitude.to_radians();
    let to_lat = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + from_lat.cos() * to_lat.cos() * (delta_lng / 2.0).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS_M * half_chord.sqrt().min(1.0).asin()
}

/// Closed, axis-aligned rectangle in lon/lat space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRect {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl GeoRect {
    /// Builds the rectangle spanned by two opposite corners.
    ///
    /// Corner order does not matter; coinciding inputs give a zero-area
    /// rectangle that only covers points on it.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            min_latitude: a.latitude.min(b.latitude),
            max_latitude: a.latitude.max(b.latitude),
            min_longitude: a.longitude.min(b.longitude),
            max_longitude: a.longitude.max(b.longitude),
        }
    }

    /// Returns whether `point` lies inside or on the boundary.
    pub fn covers(&self, point: GeoPoint) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude)
    }
}

/// Spatial containment predicate over a building location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoPredicate {
    /// Distance to `center` is at most `radius_m` meters.
    Within { center: GeoPoint, radius_m: f64 },
    /// Location is covered by the closed rectangle.
    CoveredBy(GeoRect),
}

impl GeoPredicate {
    /// Evaluates the predicate for one location.
    pub fn matches(&self, location: GeoPoint) -> bool {
        match self {
            Self::Within { center, radius_m } => distance_m(*center, location) <= *radius_m,
            Self::CoveredBy(rect) => rect.covers(location),
        }
    }

    /// Renders the predicate as a company condition on `c.building_id`.
    pub(crate) fn building_condition(&self) -> Condition {
        match self {
            Self::Within { center, radius_m } => {
                let band = radius_m / EARTH_MEAN_RADIUS_M;
                let band_deg = band.to_degrees() + LATITUDE_BAND_SLACK_DEG;
                Condition::new(
                    "c.building_id IN (
                        SELECT b.id FROM buildings b
                        WHERE b.latitude BETWEEN ? AND ?
                          AND geo_distance_m(b.latitude, b.longitude, ?, ?) <= ?
                    )",
                    vec![
                        Value::Real(center.latitude - band_deg),
                        Value::Real(center.latitude + band_deg),
                        Value::Real(center.latitude),
                        Value::Real(center.longitude),
                        Value::Real(*radius_m),
                    ],
                )
            }
            Self::CoveredBy(rect) => Condition::new(
                "c.building_id IN (
                    SELECT b.id FROM buildings b
                    WHERE b.latitude BETWEEN ? AND ?
                      AND b.longitude BETWEEN ? AND ?
                )",
                vec![
                    Value::Real(rect.min_latitude),
                    Value::Real(rect.max_latitude),
                    Value::Real(rect.min_longitude),
                    Value::Real(rect.max_longitude),
                ],
            ),
        }
    }
}

/// Geo search mode name used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoMode {
    Radius,
    Rectangle,
}

impl GeoMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Radius => "radius",
            Self::Rectangle => "rectangle",
        }
    }
}

/// Output of [`plan_geo_predicates`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoPlan {
    /// Active predicates, radius first.
    pub predicates: Vec<GeoPredicate>,
    /// Modes that received some but not all of their inputs.
    pub ignored: Vec<GeoMode>,
}

/// Builds geo predicates from the geo inputs of `filters`.
pub fn plan_geo_predicates(filters: &FilterSet) -> GeoPlan {
    let mut plan = GeoPlan::default();

    match (filters.lat, filters.lng, filters.radius) {
        (Some(latitude), Some(longitude), Some(radius)) => {
            plan.predicates.push(GeoPredicate::Within {
                center: GeoPoint::new(latitude, longitude),
                radius_m: f64::from(radius),
            });
        }
        (None, None, None) => {}
        _ => plan.ignored.push(GeoMode::Radius),
    }

    match (filters.lngx, filters.latx, filters.lngy, filters.laty) {
        (Some(lngx), Some(latx), Some(lngy), Some(laty)) => {
            plan.predicates
                .push(GeoPredicate::CoveredBy(GeoRect::from_corners(
                    GeoPoint::new(latx, lngx),
                    GeoPoint::new(laty, lngy),
                )));
        }
        (None, None, None, None) => {}
        _ => plan.ignored.push(GeoMode::Rectangle),
    }

    plan
}
